use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, StyleArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{
    escape_control, DirectoryBuilder, GlyphSet, MultiTree, NodeRef, OutlineBuilder,
    RenderOptions,
};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config_dir.as_deref())?;
    debug!(?settings, "effective settings");

    match &cli.command {
        Some(Commands::Render {
            file,
            indent,
            style,
        }) => _render(&settings, file, *indent, style),
        Some(Commands::Dir {
            path,
            max_depth,
            hidden,
            style,
        }) => _dir(&settings, path, *max_depth, *hidden, style),
        Some(Commands::Search {
            file,
            value,
            shallow,
            indent,
        }) => _search(&settings, file, value, *shallow, *indent),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => _config_show(&settings),
            ConfigCommands::Path => _config_path(),
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "multitree", &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Configured render settings with command line overrides applied.
pub fn render_options(settings: &Settings, style: &StyleArgs) -> RenderOptions {
    let mut options = settings.render_options();
    if style.ascii {
        options = options.with_glyphs(GlyphSet::Ascii);
    }
    if style.no_escape {
        options = options.with_escape(false);
    }
    options
}

pub fn outline_builder(settings: &Settings, indent: Option<usize>) -> CliResult<OutlineBuilder> {
    let width = indent.unwrap_or(settings.outline.indent_width);
    if width == 0 {
        return Err(CliError::InvalidArgs("--indent must be at least 1".to_string()));
    }
    Ok(OutlineBuilder::new().with_indent_width(width))
}

/// Labels from the root down to the parent of `hit`, joined with ` > `.
pub fn ancestor_path(hit: NodeRef<'_, String>) -> String {
    let ancestors: Vec<_> = hit.ancestors().collect();
    ancestors
        .iter()
        .rev()
        .map(|node| escape_control(node.value()))
        .join(" > ")
}

fn load_outline(builder: &OutlineBuilder, file: &Path) -> CliResult<MultiTree<String>> {
    if file == Path::new("-") {
        let text = io::read_to_string(io::stdin()).map_err(|e| CliError::io("read stdin", e))?;
        return Ok(builder.build_from_str(&text)?);
    }
    Ok(builder.build_from_path(file)?)
}

fn print_tree(tree: &MultiTree<String>, options: &RenderOptions) -> CliResult<()> {
    let mut out = io::stdout().lock();
    tree.write_to(&mut out, options)
        .map_err(|e| CliError::io("write tree", e))
}

#[instrument(skip(settings, style))]
fn _render(
    settings: &Settings,
    file: &Path,
    indent: Option<usize>,
    style: &StyleArgs,
) -> CliResult<()> {
    let tree = load_outline(&outline_builder(settings, indent)?, file)?;
    print_tree(&tree, &render_options(settings, style))
}

#[instrument(skip(settings, style))]
fn _dir(
    settings: &Settings,
    path: &Path,
    max_depth: Option<usize>,
    hidden: bool,
    style: &StyleArgs,
) -> CliResult<()> {
    let tree = DirectoryBuilder::new()
        .with_max_depth(max_depth)
        .with_hidden(hidden)
        .build_from_directory(path)?;
    print_tree(&tree, &render_options(settings, style))
}

#[instrument(skip(settings))]
fn _search(
    settings: &Settings,
    file: &Path,
    value: &str,
    shallow: bool,
    indent: Option<usize>,
) -> CliResult<()> {
    let tree = load_outline(&outline_builder(settings, indent)?, file)?;
    let needle = value.to_string();
    let hit = if shallow {
        tree.search_children(&needle)
    } else {
        tree.deep_search(&needle)
    };
    let Some(hit) = hit else {
        return Err(CliError::NotFound(value.to_string()));
    };

    output::search_hit(&ancestor_path(hit), &escape_control(hit.value()));
    Ok(())
}

fn _config_show(settings: &Settings) -> CliResult<()> {
    output::info(&settings.to_toml()?);
    Ok(())
}

fn _config_path() -> CliResult<()> {
    match global_config_path() {
        Some(path) => output::info(&path.display()),
        None => output::warning("no home directory found, global config unavailable"),
    }
    Ok(())
}
