//! fsfs CLI - single-file directory container command line interface

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fsfs::fs::read_file;
use fsfs::ops::{
    add_file, create_dir, delete, extract_all, extract_subtree, list, pack, rename, stats, verify,
    AddOutcome,
};
use fsfs::{Config, Container, Error};

#[derive(Parser)]
#[command(name = "fsfs")]
#[command(about = "single-file directory container")]
#[command(version)]
struct Cli {
    /// config file with pack and extract defaults
    #[arg(short, long, global = true, env = "FSFS_CONFIG")]
    config: Option<PathBuf>,

    /// more log output; repeat for more detail
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// pack a directory into a new container
    Create {
        /// container file to write
        container: PathBuf,

        /// directory to pack
        dir: PathBuf,
    },

    /// extract the whole container into a directory
    Mount {
        container: PathBuf,

        /// destination directory
        outdir: PathBuf,
    },

    /// list container contents
    Ls {
        container: PathBuf,

        /// path within the container
        #[arg(default_value = "")]
        path: String,
    },

    /// extract one file or directory
    Extract {
        container: PathBuf,

        /// path within the container
        path: String,

        /// destination directory
        outdir: PathBuf,
    },

    /// add or overwrite a file
    Write {
        container: PathBuf,

        /// container directory to write into
        dir_path: String,

        /// local file to copy in
        local_file: PathBuf,

        /// name inside the container (defaults to the local file name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// create a directory
    Mkdir {
        container: PathBuf,

        /// parent directory within the container
        dir_path: String,

        /// new directory name
        name: String,
    },

    /// delete a file or an empty directory
    Rm {
        container: PathBuf,

        /// path within the container
        path: String,
    },

    /// rename a file or directory
    Ren {
        container: PathBuf,

        /// path within the container
        path: String,

        /// new name for the last path segment
        new_name: String,
    },

    /// show container statistics
    Info { container: PathBuf },

    /// check container structure
    Verify { container: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> fsfs::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Create { container, dir } => {
            let packed = pack(&dir, &config.pack)?;
            packed.save_atomic(&container)?;
            println!(
                "packed {} entries ({} bytes) into {}",
                packed.table().len(),
                packed.blob().len(),
                container.display()
            );
        }

        Commands::Mount { container, outdir } => {
            let c = Container::open(&container)?;
            extract_all(&c, &outdir, &config.extract)?;
            println!("extracted {} to {}", container.display(), outdir.display());
        }

        Commands::Ls { container, path } => {
            let c = Container::open(&container)?;
            for entry in list(&c, &path)? {
                println!("{}", entry);
            }
        }

        Commands::Extract {
            container,
            path,
            outdir,
        } => {
            let c = Container::open(&container)?;
            extract_subtree(&c, &path, &outdir, &config.extract)?;
            println!("extracted {} to {}", path, outdir.display());
        }

        Commands::Write {
            container,
            dir_path,
            local_file,
            name,
        } => {
            let name = match name {
                Some(name) => name,
                None => local_name(&local_file)?,
            };
            let content = read_file(&local_file)?;

            let mut c = Container::open(&container)?;
            let outcome = add_file(&mut c, &dir_path, &name, &content)?;
            c.save_atomic(&container)?;

            let verb = match outcome {
                AddOutcome::Created(_) => "added",
                AddOutcome::Replaced(_) => "replaced",
            };
            println!("{} {} ({} bytes)", verb, name, content.len());
        }

        Commands::Mkdir {
            container,
            dir_path,
            name,
        } => {
            let mut c = Container::open(&container)?;
            create_dir(&mut c, &dir_path, &name)?;
            c.save_atomic(&container)?;
            println!("created directory {}", name);
        }

        Commands::Rm { container, path } => {
            let mut c = Container::open(&container)?;
            delete(&mut c, &path)?;
            c.save_atomic(&container)?;
            println!("deleted {}", path);
        }

        Commands::Ren {
            container,
            path,
            new_name,
        } => {
            let mut c = Container::open(&container)?;
            rename(&mut c, &path, &new_name)?;
            c.save_atomic(&container)?;
            println!("renamed {} to {}", path, new_name);
        }

        Commands::Info { container } => {
            let c = Container::open(&container)?;
            let s = stats(&c);
            println!("entries:       {}", s.entries);
            println!("  files:       {}", s.files);
            println!("  directories: {}", s.dirs);
            println!("blob bytes:    {}", s.blob_len);
            println!("file bytes:    {}", s.content_bytes);
        }

        Commands::Verify { container } => {
            let c = Container::open(&container)?;
            let report = verify(&c);

            println!("entries checked: {}", report.entries_checked);
            for (title, issues) in [
                ("dangling parents", &report.dangling_parents),
                ("file parents", &report.file_parents),
                ("bad extents", &report.bad_extents),
                ("unreachable entries", &report.unreachable),
            ] {
                if !issues.is_empty() {
                    println!("\n{}:", title);
                    for issue in issues {
                        println!("  {}", issue);
                    }
                }
            }

            if report.is_ok() {
                println!("\ncontainer is healthy");
            } else {
                println!("\ncontainer has issues");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn local_name(path: &Path) -> fsfs::Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::InvalidEntryName(format!("cannot derive a name from {}", path.display()))
        })
}
