// src/main.rs
//
// Command line front end over a CatalogMix database.
//
//   catalogmix create "Garden" --parent 1 --order 2
//   catalogmix update 3 --unpublish
//   catalogmix show 3
//   catalogmix breadcrumb 3 --from-parent

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use catalogmix::settings::DEFAULT_CONFIG_FILE;
use catalogmix::{
    BreadcrumbTarget, CatalogConfig, CatalogSync, CreateCategoryRequest, UpdateCategoryRequest,
    ROOT_PARENT_ID,
};

#[derive(Parser)]
#[command(name = "catalogmix")]
#[command(version)]
#[command(about = "Maintain denormalized category documents from the category tree")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (missing file means defaults)
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Database file, overriding the configuration
    #[arg(long, global = true)]
    database: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a category
    Create {
        name: String,

        /// Parent category id (root when omitted)
        #[arg(long, default_value_t = ROOT_PARENT_ID)]
        parent: i64,

        #[arg(long, default_value_t = 0)]
        order: i32,

        #[arg(long, default_value = "")]
        description: String,

        /// Create unpublished
        #[arg(long)]
        hidden: bool,
    },

    /// Change fields of a category
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        parent: Option<i64>,

        #[arg(long)]
        order: Option<i32>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, conflicts_with = "unpublish")]
        publish: bool,

        #[arg(long)]
        unpublish: bool,
    },

    /// Soft-delete a category
    Delete { id: i64 },

    /// Print the document of a category as JSON
    Show { id: i64 },

    /// Print the breadcrumb of a category
    Breadcrumb {
        id: i64,

        /// Start from the parent instead of the category itself
        #[arg(long)]
        from_parent: bool,

        /// Include unpublished categories
        #[arg(long)]
        show_hidden: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = CatalogConfig::load_from(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    if let Some(path) = cli.database {
        config.database.path = Some(path);
    }

    let sync = CatalogSync::open(&config).context("opening catalog database")?;
    let categories = &sync.category_service;

    match cli.command {
        Commands::Create {
            name,
            parent,
            order,
            description,
            hidden,
        } => {
            let category = categories.create_category(CreateCategoryRequest {
                name,
                parent_id: parent,
                display_order: order,
                description,
                published: !hidden,
            })?;
            println!("{}", category.id);
        }
        Commands::Update {
            id,
            name,
            parent,
            order,
            description,
            publish,
            unpublish,
        } => {
            let published = match (publish, unpublish) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            categories.update_category(UpdateCategoryRequest {
                category_id: id,
                name,
                parent_id: parent,
                display_order: order,
                description,
                published,
            })?;
        }
        Commands::Delete { id } => {
            categories.delete_category(id)?;
        }
        Commands::Show { id } => match sync.mix_service.get_by_entity_id(id)? {
            Some(document) => println!("{}", serde_json::to_string_pretty(&document)?),
            None => bail!("category {} has no document", id),
        },
        Commands::Breadcrumb {
            id,
            from_parent,
            show_hidden,
        } => {
            let target = if from_parent {
                BreadcrumbTarget::UseParent
            } else {
                BreadcrumbTarget::UseSelf
            };
            println!("{}", categories.breadcrumb_text(id, target, show_hidden)?);
        }
    }

    Ok(())
}
