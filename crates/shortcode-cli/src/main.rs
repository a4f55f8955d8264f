use anyhow::{Context, Result};
use shortcode_config::Config;
use shortcode_engine::Registry;
use std::{
    env,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process,
};

mod template;

struct Options {
    config_path: Option<PathBuf>,
    inputs: Vec<PathBuf>,
}

fn usage(program: &str) -> String {
    format!("Usage: {program} [--config PATH] [FILE ...]")
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let program = args.first().map(String::as_str).unwrap_or("shortcode-cli");
    let mut options = Options {
        config_path: None,
        inputs: vec![],
    };

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" | "-c" => match rest.next() {
                Some(path) => options.config_path = Some(PathBuf::from(path)),
                None => return Err(format!("--config needs a path\n{}", usage(program))),
            },
            "--help" | "-h" => return Err(usage(program)),
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(format!("Unknown option {flag}\n{}", usage(program)));
            }
            path => options.inputs.push(PathBuf::from(path)),
        }
    }
    Ok(options)
}

fn load_config(explicit: Option<&PathBuf>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("Config file '{}' does not exist", path.display())),
        None => {
            let config = Config::load()?;
            if config.is_none() {
                log::debug!(
                    "No config file at {}, using defaults",
                    Config::config_path().display()
                );
            }
            Ok(config.unwrap_or_default())
        }
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    };

    let config = load_config(options.config_path.as_ref())?;
    config.apply();

    let registry = Registry::get(&config.registry);
    template::register_all(&config, &registry)?;

    let inputs = if options.inputs.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        options.inputs
    };

    let mut stdout = io::stdout().lock();
    for input in &inputs {
        let text = read_input(input)?;
        let rendered = registry
            .parse(&text)
            .with_context(|| format!("Failed to render '{}'", input.display()))?;
        stdout.write_all(rendered.as_bytes())?;
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn config_flag_and_files() {
        let options = parse_args(&args(&["cli", "--config", "c.toml", "a.html", "-"])).unwrap();
        assert_eq!(options.config_path, Some(PathBuf::from("c.toml")));
        assert_eq!(options.inputs, [PathBuf::from("a.html"), PathBuf::from("-")]);
    }

    #[test]
    fn no_arguments_reads_stdin() {
        let options = parse_args(&args(&["cli"])).unwrap();
        assert_eq!(options.config_path, None);
        assert!(options.inputs.is_empty());
    }

    #[test]
    fn bad_flags_print_usage() {
        let err = parse_args(&args(&["cli", "--verbose"])).err().unwrap();
        assert!(err.contains("Unknown option --verbose"));
        assert!(err.contains("Usage: cli"));

        let err = parse_args(&args(&["cli", "--config"])).err().unwrap();
        assert!(err.contains("--config needs a path"));
    }
}
