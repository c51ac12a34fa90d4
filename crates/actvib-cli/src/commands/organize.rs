//! Wear-level grouping of a sample tree.

use super::common::{CommonArgs, load_config};
use actvib_organizer::{ActVibNaming, discover_samples, organize_by_wear};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct OrganizeArgs {
    /// Root folder of the recordings
    #[arg(value_name = "ROOT")]
    root: PathBuf,
}

pub fn run(args: OrganizeArgs, common: &CommonArgs) -> anyhow::Result<()> {
    let config = load_config(common)?;
    let naming = ActVibNaming::from(&config.naming);

    let paths = discover_samples(&args.root, &naming)?;
    let groups = organize_by_wear(&paths, &naming);

    println!("Samples by wear level:");
    println!("======================");
    if groups.is_empty() {
        println!("  (none)");
    }
    for (level, names) in groups.iter() {
        println!("  wear {level}: {} sample(s)", names.len());
        for name in names {
            println!("    {name}");
        }
    }

    if !groups.rejected().is_empty() {
        println!();
        println!("Rejected:");
        for (path, error) in groups.rejected() {
            println!("  {}: {error}", path.display());
        }
    }

    Ok(())
}
