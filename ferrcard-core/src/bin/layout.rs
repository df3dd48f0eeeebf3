use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use snafu::ResultExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ferrcard_core::{
    Element, GeometryExtractor, GroupingConfig, LayoutPipeline, ThresholdProfile,
    error::{IoReadSnafu, JsonSnafu, LayoutError},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Profile {
    Legacy,
    Revised,
}

impl From<Profile> for ThresholdProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Legacy => ThresholdProfile::Legacy,
            Profile::Revised => ThresholdProfile::Revised,
        }
    }
}

#[derive(Parser)]
#[command(name = "ferrcard-layout")]
#[command(about = "Group detected card elements into a row/column layout")]
struct Args {
    #[arg(help = "Detections JSON file (an array of elements)")]
    input: PathBuf,

    #[arg(short, long, help = "Grouping thresholds JSON file")]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, help = "Threshold profile, overrides the config file")]
    profile: Option<Profile>,

    #[arg(long, help = "Drop overlapping detections before grouping")]
    suppress_overlaps: bool,

    #[arg(long, help = "Print the nested JSON layout instead of the debug view")]
    json: bool,
}

fn read_file(path: &Path) -> Result<String, LayoutError> {
    std::fs::read_to_string(path).context(IoReadSnafu {
        path: path.display().to_string(),
    })
}

fn load_elements(path: &Path) -> Result<Vec<Element>, LayoutError> {
    serde_json::from_str(&read_file(path)?).context(JsonSnafu {
        stage: "detections",
    })
}

fn load_config(args: &Args) -> Result<GroupingConfig, LayoutError> {
    let mut config = match &args.config {
        Some(path) => GroupingConfig::from_json(&read_file(path)?)?,
        None => GroupingConfig::default(),
    };
    if let Some(profile) = args.profile {
        config.profile = profile.into();
    }
    if args.suppress_overlaps {
        config.suppress_overlaps = true;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let elements = load_elements(&args.input)?;
    info!(
        "Loaded {} element(s) from {}",
        elements.len(),
        args.input.display()
    );

    let pipeline = LayoutPipeline::new(config, GeometryExtractor);
    let card = pipeline.predict(elements).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&card.to_nodes())?);
    } else {
        print!("{}", card.tree.debug_layout());
    }

    Ok(())
}
