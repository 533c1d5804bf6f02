//! Chronicle Templates CLI
//!
//! Usage:
//!   chronicle-templates [OPTIONS] <COMMAND>
//!
//! Commands:
//!   list               List all templates
//!   describe <ID>      Show details of one template
//!   params <ID>        List the parameters of a template
//!   example <ID>       Print example arguments for a template
//!   check <ID> [ARGS]  Validate key=value arguments against a template

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chronicle_templates::{
    prepare_arguments, LoaderConfig, ResolveError, TemplateStore,
};

#[derive(Parser)]
#[command(name = "chronicle-templates")]
#[command(about = "Resolve chronicle templates and validate their arguments")]
struct Cli {
    /// Loader configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template directory (overrides the configuration file)
    #[arg(short, long)]
    templates_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all templates
    List {
        /// Include template aliases
        #[arg(short, long)]
        aliases: bool,

        /// Show description and source file for each template
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show details of one template
    Describe {
        /// Template ID or alias
        id: String,
    },

    /// List the parameters of a template
    Params {
        /// Template ID or alias
        id: String,

        /// Show type, example and choices of each parameter
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print example arguments for a template
    Example {
        /// Template ID or alias
        id: String,
    },

    /// Validate key=value arguments against a template
    Check {
        /// Template ID or alias
        id: String,

        /// Arguments of the form key=value
        args: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => match LoaderConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LoaderConfig::default(),
    };
    if let Some(dir) = &cli.templates_dir {
        config.root = dir.clone();
    }

    let store = match TemplateStore::from_config(&config) {
        Ok(store) => store,
        Err(e) => {
            print_error(&e, &config);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli.command, &store) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: &Command, store: &TemplateStore) -> Result<(), ResolveError> {
    match command {
        Command::List { aliases, verbose } => {
            for id in store.list_template_ids(*aliases) {
                let template = store.get_template(&id)?;
                if template.id() == id {
                    println!("{}", template.describe(*verbose));
                } else {
                    println!("- {} (alias of {})", id, template.id());
                }
            }
        }
        Command::Describe { id } => {
            let template = store.get_template(id)?;
            println!("{}", template.describe(true));
            if let Some(parent) = template.inherit() {
                println!("\tInherits: {}", parent);
            }
            println!("\tContent: {}", template.content_ids(false).join(", "));
            println!("\tPresets: {}", template.preset_ids().join(", "));
            println!("\tParameters: {}", template.parameters().sorted_keys().join(", "));
        }
        Command::Params { id, verbose } => {
            let template = store.get_template(id)?;
            println!("{}", template.parameters().describe(*verbose));
        }
        Command::Example { id } => {
            let template = store.get_template(id)?;
            println!("{}", template.parameters().example_arguments().join(" "));
        }
        Command::Check { id, args } => {
            let template = store.get_template(id)?;
            let processed = prepare_arguments(template, args)?;
            for (key, value) in processed.iter() {
                println!("{}={}", key, value);
            }
        }
    }
    Ok(())
}

/// Print an error, with a source snippet when it points into a template file
fn print_error(err: &ResolveError, config: &LoaderConfig) {
    if let ResolveError::Load {
        locator: Some(locator),
        offset: Some(_),
        ..
    } = err.root()
    {
        if let Ok(source) = std::fs::read_to_string(config.root.join(locator)) {
            eprint!("{}", err.report(&source, locator));
            return;
        }
    }
    eprintln!("Error: {}", err);
}
