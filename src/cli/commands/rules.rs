//! Rule table listing and config bootstrap.

use anyhow::{Context, bail};
use std::path::Path;

use crate::config::{self, Config};
use crate::provenance::LinkTransform;

/// Print the active provenance rules in priority order
pub fn cmd_rules(config: &Config) -> anyhow::Result<()> {
    let table = config
        .provenance
        .rule_table()
        .context("Invalid provenance rules in config")?;

    if table.is_empty() {
        println!("No provenance rules configured.");
        return Ok(());
    }

    for (index, rule) in table.iter().enumerate() {
        let transform = match rule.transform() {
            LinkTransform::Verbatim => "verbatim".to_string(),
            LinkTransform::Rewrite(_) => "canonicalized".to_string(),
            LinkTransform::Template(template) => format!("template {template}"),
        };
        println!("{:>2}. {:<12} {}", index + 1, rule.provider(), rule.pattern());
        println!("    link: {}", transform);
    }
    println!(
        "\nComments are matched against these rules only; files without a comment \
         fall back to iTunes store ids."
    );
    Ok(())
}

/// Write a default config file
pub fn cmd_init_config(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => config::config_path().context("Could not determine config directory")?,
    };

    if target.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            target.display()
        );
    }

    let written = config::save_to(&Config::default(), &target)?;
    println!("Wrote default config to {}", written.display());
    Ok(())
}
