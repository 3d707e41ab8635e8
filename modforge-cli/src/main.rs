// CLI application
use clap::Parser;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "modforge")]
#[command(about = "Mod directory inspection and offline crash diagnostics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List and validate the mods in a directory
    List {
        /// Directory containing one subdirectory per mod
        mods_dir: PathBuf,

        /// Descriptor file name to look for in each mod directory
        #[arg(long, default_value = "Info.json")]
        descriptor_file: String,
    },
    /// Print the resolved activation order
    Order {
        /// Directory containing one subdirectory per mod
        mods_dir: PathBuf,

        /// Descriptor file name to look for in each mod directory
        #[arg(long, default_value = "Info.json")]
        descriptor_file: String,
    },
    /// Attribute a captured error text against a diagnostics snapshot
    Attribute {
        /// Diagnostics snapshot exported by the running framework
        #[arg(short, long)]
        snapshot: PathBuf,

        /// File whose entire content is scanned as the error text
        #[arg(short, long, conflicts_with_all = ["message", "stack"])]
        log_file: Option<PathBuf>,

        /// Error message to scan
        #[arg(short, long)]
        message: Option<String>,

        /// Stack trace text to scan
        #[arg(long, requires = "message")]
        stack: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { mods_dir, descriptor_file } => {
            commands::list_mods(&mods_dir, &descriptor_file)
        }
        Commands::Order { mods_dir, descriptor_file } => {
            commands::print_order(&mods_dir, &descriptor_file)
        }
        Commands::Attribute { snapshot, log_file, message, stack } => {
            let (message, stack) = match log_file {
                Some(path) => (std::fs::read_to_string(&path)?, String::new()),
                None => (message.unwrap_or_default(), stack.unwrap_or_default()),
            };
            commands::attribute(&snapshot, &message, &stack)
        }
    }
}
