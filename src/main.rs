// SPDX-License-Identifier: MPL-2.0
use env_logger::{Builder, Target};
use log::LevelFilter;
use m3u8_player::app::{self, Flags};

const HELP: &str = "\
M3U8 Player - lightweight HLS stream player

USAGE:
  m3u8_player [OPTIONS] [URL]

OPTIONS:
  -h, --help              Print this help message
      --lang <id>         Interface language (e.g. en-US, zh-CN)
      --config-dir <dir>  Directory holding settings.toml

ARGS:
  [URL]                   Stream address used to pre-fill the input
";

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("m3u8_player", LevelFilter::Debug)
        .init();
}

fn parse_flags() -> Result<Option<Flags>, pico_args::Error> {
    parse_flags_from(pico_args::Arguments::from_env())
}

fn parse_flags_from(mut args: pico_args::Arguments) -> Result<Option<Flags>, pico_args::Error> {
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let lang = args.opt_value_from_str("--lang")?;
    let config_dir = args.opt_value_from_str("--config-dir")?;
    let rest: Vec<String> = args
        .finish()
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let unknown: Vec<String> = rest
        .iter()
        .filter(|arg| arg.starts_with('-'))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(pico_args::Error::UnusedArgsLeft(unknown));
    }

    Ok(Some(Flags {
        lang,
        url: rest.into_iter().next(),
        config_dir,
    }))
}

fn main() -> iced::Result {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let flags = match parse_flags() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{HELP}");
            return Ok(());
        }
        Err(err) => {
            eprintln!("Error: {err}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    app::run(flags)
}
