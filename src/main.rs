use std::io::{self, Write};

use clap::{Parser, Subcommand};
use gift_assistant::{
    config::API_KEY_ENV, EndpointConfig, Gender, GiftGenerator, GiftSuggestion,
    GptClient, Outcome, Profile, SettingsStore, YamlSettingsStore,
};
use spinners::{Spinner, Spinners};
use termion::{color, event::Key, input::TermRead, raw::IntoRawMode, style};
use tracing_subscriber::EnvFilter;

const RED: color::Fg<color::Red> = color::Fg(color::Red);
const BLUE: color::Fg<color::Blue> = color::Fg(color::Blue);
const GREEN: color::Fg<color::Green> = color::Fg(color::Green);
const YELLOW: color::Fg<color::Yellow> = color::Fg(color::Yellow);
const RESET: style::Reset = style::Reset;

#[derive(Parser, Debug)]
#[command(version, about = "送礼灵感生成器")]
struct Args {
    /// Log at debug level
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show or change the API endpoint settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate gift suggestions for a recipient
    Generate {
        /// 男 / 女 (male / female)
        #[arg(short = 'g', long)]
        gender: Gender,
        #[arg(short = 'a', long)]
        age: u8,
        #[arg(short = 'i', long)]
        interests: Option<String>,
        #[arg(long)]
        budget_min: u32,
        #[arg(long)]
        budget_max: u32,
        /// Print one result and exit instead of offering to regenerate
        #[arg(short = 'o', long)]
        oneshot: bool,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Show,
    Set {
        #[arg(long)]
        url: Option<String>,
        /// Prompted for when given without a value
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        api_key: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let store = YamlSettingsStore::in_home()?;
    store.load_env();
    let stored = store.load()?.unwrap_or_default();

    match args.command {
        Command::Config { action } => configure(&store, stored, action),
        Command::Generate {
            gender,
            age,
            interests,
            budget_min,
            budget_max,
            oneshot,
            json,
        } => {
            let config = stored.with_api_key_override(dotenv::var(API_KEY_ENV).ok());
            let profile = match Profile::new(gender, age, interests, budget_min, budget_max) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("{}{}{}", RED, e, RESET);
                    return Ok(());
                }
            };
            generate(&config, profile, oneshot, json).await
        }
    }
}

fn configure(
    store: &YamlSettingsStore,
    mut config: EndpointConfig,
    action: ConfigAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            println!("API URL: {}", config.url);
            println!("API Key: {}", config.masked_api_key());
            println!("Model:   {}", config.model);
            println!("{}", store.config_path().display());
        }
        ConfigAction::Set {
            url,
            api_key,
            model,
        } => {
            if let Some(url) = url {
                config.url = url;
            }
            if let Some(key) = api_key {
                config.api_key = if key.is_empty() {
                    read_line("API Key: ")
                } else {
                    key
                };
            }
            if let Some(model) = model {
                config.model = model;
            }
            store.save(&config)?;
            println!("{}API配置已保存{}", GREEN, RESET);
        }
    }
    Ok(())
}

async fn generate(
    config: &EndpointConfig,
    profile: Profile,
    oneshot: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = config.ensure_api_key() {
        eprintln!("{}{}{}", RED, e, RESET);
        return Ok(());
    }

    let stdout_tty = termion::is_tty(&io::stdout());
    let interactive = offers_regenerate(oneshot, termion::is_tty(&io::stdin()), stdout_tty);

    let client = GptClient::new(config);
    let mut generator = GiftGenerator::new();

    let mut spinner = start_spinner(stdout_tty, "正在生成礼物推荐...");
    let mut result = generator.submit(&client, profile).await;
    loop {
        if let Some(mut s) = spinner.take() {
            s.stop_with_newline();
        }
        match result {
            Ok(Outcome::Suggestions(gifts)) => print_gifts(&gifts, json)?,
            Ok(Outcome::Unparsed { .. }) => {
                eprintln!("{}未能解析礼物推荐，请检查API返回格式{}", YELLOW, RESET)
            }
            Err(e) => eprintln!("{}{}{}", RED, e, RESET),
        }

        if !interactive || !wait_for_regenerate()? {
            return Ok(());
        }
        spinner = start_spinner(stdout_tty, "正在生成新的推荐...");
        result = generator.regenerate(&client).await;
    }
}

/// The `r`/`q` prompt needs a terminal on both ends; otherwise behave like `--oneshot`.
fn offers_regenerate(oneshot: bool, stdin_tty: bool, stdout_tty: bool) -> bool {
    !oneshot && stdin_tty && stdout_tty
}

fn start_spinner(stdout_tty: bool, message: &str) -> Option<Spinner> {
    stdout_tty.then(|| Spinner::new(Spinners::Dots, message.into()))
}

fn print_gifts(gifts: &[GiftSuggestion], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(gifts)?);
        return Ok(());
    }
    println!("{}礼物推荐生成成功！{}", GREEN, RESET);
    for (index, gift) in gifts.iter().enumerate() {
        println!("{}{}. {}{} [{}]", BLUE, index + 1, gift.name, RESET, gift.feature);
    }
    Ok(())
}

/// `r` asks for another batch; `q`, Ctrl-C or end of input stops.
fn wait_for_regenerate() -> Result<bool, Box<dyn std::error::Error>> {
    println!("[r] 换一批  [q] 退出");
    let stdin = io::stdin();
    let mut stdout = io::stdout().into_raw_mode()?;
    stdout.flush()?;

    let mut again = false;
    for key in stdin.keys() {
        match key? {
            Key::Char('r') | Key::Char('R') => {
                again = true;
                break;
            }
            Key::Char('q') | Key::Char('Q') | Key::Ctrl('c') | Key::Esc => break,
            _ => {}
        }
    }
    drop(stdout);
    Ok(again)
}

fn read_line(inline_message: &str) -> String {
    print!("{}", inline_message);
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regenerate_prompt_requires_a_terminal() {
        assert!(offers_regenerate(false, true, true));
        assert!(!offers_regenerate(true, true, true));
        assert!(!offers_regenerate(false, true, false));
        assert!(!offers_regenerate(false, false, true));
    }

    #[test]
    fn no_spinner_when_output_is_redirected() {
        assert!(start_spinner(false, "x").is_none());
    }

    #[test]
    fn generate_flags_parse() {
        let args = Args::try_parse_from([
            "gift-assistant",
            "generate",
            "-g",
            "女",
            "-a",
            "25",
            "--budget-min",
            "1",
            "--budget-max",
            "2",
            "--json",
        ])
        .unwrap();
        match args.command {
            Command::Generate {
                gender, json, oneshot, ..
            } => {
                assert_eq!(gender, Gender::Female);
                assert!(json);
                assert!(!oneshot);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
