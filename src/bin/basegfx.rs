//! basegfx command-line tool

use anyhow::Context;
use basegfx::blitter::{BLITTERS, candidates};
use basegfx::extension::ExtensionConfig;
use basegfx::grf::inspect_container;
use basegfx::{
    BlitterRequirements, GfxError, GfxSettings, Landscape, LoadOptions, SetKind, Support8bpp,
    exit_codes::*, load_set, select_blitter, verify_set,
};
use clap::{Parser, Subcommand};
use std::{env, panic, path::PathBuf, process};

const VERSION: &str = basegfx::version::VERSION;

#[derive(Parser, Debug)]
#[command(version = VERSION, about = "Load, verify and inspect base graphics sets")]
struct Cli {
    /// Log level (trace, debug, info, warn, error; prefix json: for JSON lines)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every file of a set against its digest
    Verify {
        /// Set catalog (JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Directory to search for set files (repeatable, defaults to CWD)
        #[arg(short = 'd', long = "dir")]
        dirs: Vec<PathBuf>,

        /// Set name; empty picks the best available set
        #[arg(short, long, default_value = "")]
        set: String,

        /// Verify a sounds set instead of a graphics set
        #[arg(long)]
        sounds: bool,
    },

    /// Run a complete sprite load and report what was loaded
    Load {
        #[arg(short, long)]
        catalog: PathBuf,

        #[arg(short = 'd', long = "dir")]
        dirs: Vec<PathBuf>,

        #[arg(short, long, default_value = "")]
        set: String,

        #[arg(long, default_value = "temperate")]
        landscape: Landscape,

        /// Turn full animation off
        #[arg(long)]
        no_animation: bool,

        /// Pretend the display has no 8bpp support
        #[arg(long)]
        no_8bpp: bool,

        /// Pin this blitter instead of choosing one from the content
        #[arg(long)]
        blitter: Option<String>,

        /// Extension file to load after the base extension (repeatable)
        #[arg(long = "extension")]
        extensions: Vec<String>,

        /// Extension file with 32bpp content (repeatable)
        #[arg(long = "hd-extension")]
        hd_extensions: Vec<String>,
    },

    /// Show which blitter the given content needs
    SelectBlitter {
        #[arg(long)]
        base_32bpp: bool,

        #[arg(long)]
        content_32bpp: bool,

        #[arg(long)]
        animation: bool,
    },

    /// List the blitter selection order and every known blitter
    Blitters,

    /// Summarise the records of a GRF container
    Inspect { file: PathBuf },
}

fn main() {
    // Set up panic handler to return specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        process::exit(EXIT_PANIC);
    }));

    let result = panic::catch_unwind(run);

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in basegfx");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    // Handle --version before clap
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("basegfx {}", basegfx::version::full_version());
        return EXIT_SUCCESS;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                EXIT_INVALID_ARGS
            } else {
                EXIT_SUCCESS
            };
        }
    };

    if let Some(ref level) = cli.log_level {
        basegfx::logger::JsonLogger::init_with_level(level, "CLI --log-level");
    } else {
        basegfx::logger::JsonLogger::init();
    }
    log::debug!("🚀 basegfx {} started", VERSION);

    match run_command(cli.command) {
        Ok(code) => code,
        Err(e) => {
            log::error!("❌ {:#}", e);
            eprintln!("Error: {:#}", e);
            e.downcast_ref::<GfxError>()
                .map(GfxError::exit_code)
                .unwrap_or(EXIT_ERROR)
        }
    }
}

fn search_dirs(dirs: Vec<PathBuf>) -> Vec<PathBuf> {
    if dirs.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        dirs
    }
}

fn run_command(command: Command) -> anyhow::Result<i32> {
    match command {
        Command::Verify {
            catalog,
            dirs,
            set,
            sounds,
        } => {
            let kind = if sounds {
                SetKind::Sounds
            } else {
                SetKind::Graphics
            };
            let report = verify_set(&catalog, &search_dirs(dirs), kind, &set)
                .with_context(|| format!("verifying set from {}", catalog.display()))?;

            for entry in report.entries() {
                println!("{:<10} {:<8} {}", entry.role, entry.result.label(), entry.filename);
            }
            match report.message() {
                Some(message) => {
                    eprint!("{}", message);
                    Ok(EXIT_INCOMPLETE_SET)
                }
                None => {
                    println!("✅ Set '{}' is complete", report.set_name());
                    Ok(EXIT_SUCCESS)
                }
            }
        }

        Command::Load {
            catalog,
            dirs,
            set,
            landscape,
            no_animation,
            no_8bpp,
            blitter,
            extensions,
            hd_extensions,
        } => {
            let mut configs: Vec<ExtensionConfig> =
                extensions.into_iter().map(ExtensionConfig::new).collect();
            configs.extend(hd_extensions.into_iter().map(|name| ExtensionConfig {
                wants_32bpp: true,
                ..ExtensionConfig::new(name)
            }));

            let options = LoadOptions {
                set_name: set,
                settings: GfxSettings {
                    landscape,
                    full_animation: !no_animation,
                    support_8bpp: if no_8bpp {
                        Support8bpp::None
                    } else {
                        Support8bpp::default()
                    },
                    ..GfxSettings::default()
                },
                blitter,
                extensions: configs,
            };
            let result = load_set(&catalog, &search_dirs(dirs), options)
                .with_context(|| format!("loading set from {}", catalog.display()))?;

            println!("set:        {}", result.set_name);
            println!("landscape:  {}", landscape);
            println!("base:       {}", result.summary.base);
            println!("logos:      {}", result.summary.logos);
            println!("climate:    {}", result.summary.landscape);
            println!("extensions: {}", result.summary.extensions);
            println!("in table:   {}", result.sprites_loaded);
            println!("blitter:    {}", result.blitter);

            let complete = result.report.as_ref().is_none_or(|r| r.is_complete());
            Ok(if complete {
                EXIT_SUCCESS
            } else {
                EXIT_INCOMPLETE_SET
            })
        }

        Command::SelectBlitter {
            base_32bpp,
            content_32bpp,
            animation,
        } => {
            let chosen = select_blitter(&BlitterRequirements {
                base_wants_32bpp: base_32bpp,
                content_wants_32bpp: content_32bpp,
                animation_wanted: animation,
            });
            println!("{}", chosen.name);
            Ok(EXIT_SUCCESS)
        }

        Command::Blitters => {
            println!("Selection order:");
            for (i, c) in candidates().enumerate() {
                println!(
                    "  {}. {:<16} animation={:?} base={:?} content={:?}",
                    i + 1,
                    c.name,
                    c.animation,
                    c.base_depth,
                    c.content_depth
                );
            }
            println!("Known blitters:");
            for b in BLITTERS {
                println!("  {:<16} {:>2}bpp  {}", b.name, b.screen_depth, b.description);
            }
            Ok(EXIT_SUCCESS)
        }

        Command::Inspect { file } => {
            let summary = inspect_container(&file)
                .with_context(|| format!("inspecting {}", file.display()))?;
            println!("container version: {}", summary.version);
            println!("sprites:           {}", summary.sprites);
            println!("  recolour:        {}", summary.recolour_sprites);
            println!("  invalid:         {}", summary.invalid_sprites);
            println!("sprite section:    {} ids", summary.sprite_section_ids);
            match summary.data_section_size {
                Some(size) => println!("hashed bytes:      {}", size),
                None => println!("hashed bytes:      whole file"),
            }
            Ok(EXIT_SUCCESS)
        }
    }
}
