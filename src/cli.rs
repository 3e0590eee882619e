use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "marketmind", version, about = "Market news sentiment analyzer")]
pub struct Cli {
    #[arg(help = "Company name or ticker to analyze")]
    pub company: String,
    #[arg(long, help = "Explicit stock ticker, skips the name lookup")]
    pub ticker: Option<String>,
    #[arg(long, default_value = "config.yml", help = "Config file path")]
    pub config: String,
}
