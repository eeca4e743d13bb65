use std::env;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::{load_config, ConfigFile, LinkerOptions, DEFAULT_RETRIES};
use crate::core::workspace::Workspace;
use crate::error::{DeplinkError, Result};
use crate::exec::Executor;
use crate::graph::resolve::{resolve, ResolutionStep};
use crate::graph::{viz, DependencyGraph};
use crate::link::{parse_strategy, strategy_for, StrategyKind};
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "deplink")]
#[command(about = "Wire locally checked-out packages together in dependency order", long_about = None)]
pub struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Link(LinkArgs),
    Order(OrderArgs),
    Graph(GraphArgs),
}

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Directory whose child checkouts should be linked
    #[arg(env = "DEPLINK_ROOT")]
    pub dir: Option<PathBuf>,
    #[arg(short = 's', long)]
    pub symlinks: bool,
    #[arg(short = 'd', long)]
    pub dry_run: bool,
    #[arg(short = 'f', long)]
    pub force: bool,
    #[arg(long)]
    pub parallel: Option<usize>,
}

#[derive(Args, Debug)]
pub struct OrderArgs {
    #[arg(env = "DEPLINK_ROOT")]
    pub dir: Option<PathBuf>,
    #[arg(short = 's', long)]
    pub symlinks: bool,
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub parallel: Option<usize>,
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[arg(env = "DEPLINK_ROOT")]
    pub dir: Option<PathBuf>,
    #[arg(long, default_value = "tree")]
    pub format: String,
    #[arg(long)]
    pub json: bool,
    #[arg(long)]
    pub parallel: Option<usize>,
}

pub fn run() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Link(args) => handle_link(args, cli.verbose, cli.quiet),
        Commands::Order(args) => handle_order(args, cli.verbose, cli.quiet),
        Commands::Graph(args) => handle_graph(args, cli.verbose, cli.quiet),
    }
}

fn handle_link(args: LinkArgs, verbose: u8, quiet: bool) -> Result<()> {
    let root = resolve_root(args.dir)?;
    let config = load_config(&root)?;
    let options = build_options(
        &config,
        Overrides {
            symlinks: args.symlinks,
            dry_run: args.dry_run,
            force: args.force,
            parallel: args.parallel,
            verbose,
            quiet,
        },
    )?;

    let workspace = Workspace::discover(&root, &options)?;
    if workspace.modules.is_empty() {
        output::warn(&format!(
            "no linkable packages found under {}",
            root.display()
        ));
        return Ok(());
    }

    let strategy = strategy_for(options.strategy);
    if !options.quiet {
        output::info(&format!(
            "linking {} packages under {} via {}",
            workspace.modules.len(),
            root.display(),
            strategy.id()
        ));
    }

    let resolution = resolve(
        &workspace.graph,
        &workspace.modules,
        strategy.as_ref(),
        &options,
    )?;

    Executor::new(&options).execute(&root, &resolution.commands)?;

    if !options.quiet {
        output::info(&format!(
            "linked {} packages in {} steps",
            workspace.modules.len(),
            resolution.steps.len()
        ));
    }
    Ok(())
}

fn handle_order(args: OrderArgs, verbose: u8, quiet: bool) -> Result<()> {
    let root = resolve_root(args.dir)?;
    let config = load_config(&root)?;
    let options = build_options(
        &config,
        Overrides {
            symlinks: args.symlinks,
            dry_run: true,
            force: false,
            parallel: args.parallel,
            verbose,
            quiet,
        },
    )?;

    let workspace = Workspace::discover(&root, &options)?;
    let strategy = strategy_for(options.strategy);
    let resolution = resolve(
        &workspace.graph,
        &workspace.modules,
        strategy.as_ref(),
        &options,
    )?;

    if args.json {
        println!("{}", to_json(&resolution.steps)?);
    } else {
        for (idx, step) in resolution.steps.iter().enumerate() {
            match step {
                ResolutionStep::Single(name) => println!("{}. {name}", idx + 1),
                ResolutionStep::Pair(first, second) => {
                    println!("{}. {first} + {second} (cyclic pair)", idx + 1)
                }
            }
        }
    }
    Ok(())
}

fn handle_graph(args: GraphArgs, verbose: u8, quiet: bool) -> Result<()> {
    let root = resolve_root(args.dir)?;
    let config = load_config(&root)?;
    let options = build_options(
        &config,
        Overrides {
            symlinks: false,
            dry_run: true,
            force: false,
            parallel: args.parallel,
            verbose,
            quiet,
        },
    )?;

    let workspace = Workspace::discover(&root, &options)?;

    if args.json {
        println!("{}", to_json(&GraphJson::from_graph(&workspace.graph))?);
        return Ok(());
    }

    let rendered = match args.format.as_str() {
        "dot" => viz::render_dot(&workspace.graph),
        _ => viz::render_tree(&workspace.graph),
    };
    print!("{rendered}");
    Ok(())
}

struct Overrides {
    symlinks: bool,
    dry_run: bool,
    force: bool,
    parallel: Option<usize>,
    verbose: u8,
    quiet: bool,
}

fn build_options(config: &ConfigFile, flags: Overrides) -> Result<LinkerOptions> {
    let strategy = if flags.symlinks {
        StrategyKind::Symlink
    } else if let Some(value) = config.linker.strategy.as_deref() {
        parse_strategy(value).ok_or_else(|| {
            DeplinkError::Other(anyhow::anyhow!("unknown link strategy '{value}' in config"))
        })?
    } else {
        StrategyKind::PackageManager
    };

    Ok(LinkerOptions {
        strategy,
        dry_run: flags.dry_run,
        force: flags.force,
        verbose: flags.verbose,
        quiet: flags.quiet,
        retries: config.linker.retries.unwrap_or(DEFAULT_RETRIES),
        ignore: config.linker.ignore.clone(),
        post_link: config.hooks.post_link.clone(),
        jobs: resolve_parallel(flags.parallel),
    })
}

fn resolve_root(dir: Option<PathBuf>) -> Result<PathBuf> {
    let root = match dir {
        Some(dir) => dir,
        None => env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(DeplinkError::Other(anyhow::anyhow!(
            "working directory {} does not exist",
            root.display()
        )));
    }
    Ok(root)
}

fn resolve_parallel(override_value: Option<usize>) -> Option<usize> {
    if let Some(value) = override_value {
        return Some(value);
    }
    if let Ok(value) = env::var("DEPLINK_PARALLEL") {
        if let Ok(parsed) = value.parse() {
            return Some(parsed);
        }
    }
    std::thread::available_parallelism().ok().map(|n| n.get())
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|err| DeplinkError::Other(anyhow::Error::new(err)))
}

#[derive(Serialize)]
struct GraphJson {
    nodes: Vec<GraphNodeJson>,
    edges: Vec<GraphEdgeJson>,
}

#[derive(Serialize)]
struct GraphNodeJson {
    name: String,
    cyclic: bool,
}

#[derive(Serialize)]
struct GraphEdgeJson {
    from: String,
    to: String,
}

impl GraphJson {
    fn from_graph(graph: &DependencyGraph) -> Self {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for node in graph.iter() {
            nodes.push(GraphNodeJson {
                name: node.name.as_str().to_string(),
                cyclic: node.cyclic,
            });
            for dep in &node.depends_on {
                edges.push(GraphEdgeJson {
                    from: node.name.as_str().to_string(),
                    to: dep.as_str().to_string(),
                });
            }
        }
        Self { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ConfigFile;
    use crate::link::StrategyKind;

    use super::{build_options, Overrides};

    fn overrides() -> Overrides {
        Overrides {
            symlinks: false,
            dry_run: false,
            force: false,
            parallel: Some(1),
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn symlinks_flag_overrides_config_strategy() {
        let mut config = ConfigFile::default();
        config.linker.strategy = Some("npm-link".to_string());

        let options = build_options(
            &config,
            Overrides {
                symlinks: true,
                ..overrides()
            },
        )
        .expect("options");
        assert_eq!(options.strategy, StrategyKind::Symlink);
    }

    #[test]
    fn config_strategy_applies_without_flag() {
        let mut config = ConfigFile::default();
        config.linker.strategy = Some("symlink".to_string());

        let options = build_options(&config, overrides()).expect("options");
        assert_eq!(options.strategy, StrategyKind::Symlink);
    }

    #[test]
    fn unknown_config_strategy_is_rejected() {
        let mut config = ConfigFile::default();
        config.linker.strategy = Some("carrier-pigeon".to_string());

        assert!(build_options(&config, overrides()).is_err());
    }

    #[test]
    fn defaults_fill_the_remaining_options() {
        let options = build_options(&ConfigFile::default(), overrides()).expect("options");
        assert_eq!(options.strategy, StrategyKind::PackageManager);
        assert_eq!(options.retries, crate::config::DEFAULT_RETRIES);
        assert!(options.post_link.is_empty());
    }
}
