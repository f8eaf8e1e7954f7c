use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use java_opts::config::Config;
use java_opts::logging::init_tracing;
use java_opts::opts::{
    build_launch_params, escape_option, tokenize, user_fragment, write_fragment, FragmentStore,
    LaunchParams, OptsAssembler, ResolveMode, Resolver, RuntimeContext,
};

#[derive(Parser, Debug)]
#[command(name = "java-opts", version, about = "Stage and assemble JAVA_OPTS fragments")]
struct Cli {
    /// Config file (default: ~/.config/java-opts/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Fragment directory, overrides `store.dir`.
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write one fragment.
    Put {
        #[arg(long)]
        priority: u8,
        #[arg(long)]
        name: String,
        /// Treat CONTENT as user options: tokenize and re-escape.
        #[arg(long, default_value_t = false)]
        escape: bool,
        #[arg(allow_hyphen_values = true)]
        content: String,
    },
    /// Write the end-user fragment from RAW or `user.java_opts`.
    UserOpts {
        #[arg(allow_hyphen_values = true)]
        raw: Option<String>,
    },
    /// List fragments in assembly order.
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the assembled option string.
    Resolve {
        #[command(flatten)]
        launch: LaunchArgs,
    },
    /// Run a command with the assembled option string in its environment.
    Exec {
        #[command(flatten)]
        launch: LaunchArgs,
        /// Extra variable for the child, repeatable.
        #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
        env: Vec<(String, String)>,
        #[arg(trailing_var_arg = true, required = true, num_args = 1..)]
        command: Vec<String>,
    },
    /// Split an option string and print the tokens as JSON.
    Tokenize {
        #[arg(allow_hyphen_values = true)]
        raw: String,
    },
    /// Escape the value of each `key=value` option.
    Escape {
        #[arg(allow_hyphen_values = true)]
        options: Vec<String>,
    },
}

#[derive(clap::Args, Debug)]
struct LaunchArgs {
    #[arg(long)]
    install_root: Option<PathBuf>,
    #[arg(long)]
    home: Option<PathBuf>,
    /// Fail on unresolved variables.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() {
    init_tracing();
    match run(Cli::parse()) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let store = FragmentStore::new(cli.store.clone().unwrap_or_else(|| config.store.dir.clone()));

    match cli.command {
        Commands::Put {
            priority,
            name,
            escape,
            content,
        } => {
            let content = if escape {
                OptsAssembler::new().with_user_opts(&content)?.build()
            } else {
                content
            };
            write_fragment(&store, priority, &name, &content)
                .with_context(|| format!("fragment {:02}_{} not written", priority, name))?;
        }
        Commands::UserOpts { raw } => {
            let raw = raw.unwrap_or_else(|| config.user.java_opts.clone());
            let fragment = user_fragment(
                &raw,
                config.user.from_environment,
                &config.placeholders.passthrough,
            )?;
            store.put(&fragment)?;
        }
        Commands::List { json } => {
            let fragments = store.all_ordered()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&fragments)?);
            } else {
                for fragment in &fragments {
                    println!("{}", fragment);
                }
            }
        }
        Commands::Resolve { launch } => {
            let params = launch_params(&config, &store, &launch, Vec::new())?;
            println!("{}", params.java_opts);
        }
        Commands::Exec {
            launch,
            env,
            command,
        } => {
            let params = launch_params(&config, &store, &launch, env)?;
            let Some((program, args)) = command.split_first() else {
                bail!("no command given");
            };
            let status = Command::new(program)
                .args(args)
                .envs(params.env)
                .status()
                .with_context(|| format!("failed to run '{}'", program))?;
            return Ok(status.code().unwrap_or(1));
        }
        Commands::Tokenize { raw } => {
            println!("{}", serde_json::to_string(&tokenize(&raw)?)?);
        }
        Commands::Escape { options } => {
            for option in &options {
                println!("{}", escape_option(option));
            }
        }
    }

    Ok(0)
}

fn launch_params(
    config: &Config,
    store: &FragmentStore,
    launch: &LaunchArgs,
    extra_env: Vec<(String, String)>,
) -> anyhow::Result<LaunchParams> {
    let placeholders = config.placeholders.to_placeholders();
    let ctx = RuntimeContext::from_process(
        launch.install_root.clone(),
        launch.home.clone(),
        &placeholders,
    );
    let mode = if launch.strict {
        ResolveMode::Strict
    } else {
        config.resolver.mode()
    };
    let resolver = Resolver::new(placeholders, mode);

    // Unresolved variables are reported by the resolver's `warn!` events.
    Ok(build_launch_params(
        store,
        &ctx,
        &resolver,
        &config.launch.variable,
        extra_env,
    )?)
}

fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
