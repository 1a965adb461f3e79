//! Site building orchestration.
//!
//! One pass, single-threaded:
//!
//! ```text
//! build_site()
//!     │
//!     ├── prepare_output()   ──► delete build dir (after confirmation), recreate
//!     ├── load_global()      ──► context.yaml + now/today
//!     ├── collect_posts()    ──► blog index → `posts`
//!     ├── walk()             ──► ignore / convert / copy every source entry
//!     ├── write_sitemap()    ──► sitemap.xml.gz from the URL registry
//!     └── build_feed()       ──► feed.xml (only with an `rss` context block)
//! ```
//!
//! By default the first failing file aborts the build. In keep-going mode
//! failures are logged and collected, the aggregates are still written, and
//! the build ends with [`BuildError::Failures`].

use crate::{
    config::SiteConfig,
    context::{Mapping, PageRef, Value, load_global},
    decoder::DecoderRegistry,
    error::{BuildError, BuildResult, FileFailure},
    generator::{
        blog::{self, BlogPost, BlogSource},
        rss::build_feed,
        sitemap::{UrlRegistry, write_sitemap},
    },
    log,
    render::{FileKind, Renderer},
    template::TemplateEngine,
    utils::{ignore::IgnoreMatcher, slug},
};
use anyhow::{Context, Result, bail};
use std::{
    fs,
    io::{self, BufRead, Write},
    path::Path,
};
use walkdir::WalkDir;

// ============================================================================
// Build State
// ============================================================================

/// Everything the stages share, owned by one build.
pub struct BuildState {
    /// Global context; read-only once the walk starts.
    pub context: Mapping,
    pub posts: Vec<BlogPost>,
    pub urls: UrlRegistry,
    pub failures: Vec<FileFailure>,
}

/// Result of a build that did not fail.
#[derive(Debug, PartialEq, Eq)]
pub enum BuildOutcome {
    Built(BuildSummary),
    /// The user declined to delete the existing build directory.
    Declined,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub converted: usize,
    pub copied: usize,
    pub ignored: usize,
    pub feed: bool,
}

/// What happened to one source file.
enum FileAction {
    Converted,
    Copied,
}

// ============================================================================
// Public API
// ============================================================================

/// Build the site described by `config`.
///
/// `confirm` is asked before an existing build directory is deleted, unless
/// `config.build.force` is set.
pub fn build_site(
    config: &SiteConfig,
    confirm: impl FnOnce(&Path) -> Result<bool>,
) -> Result<BuildOutcome> {
    let build = &config.build;
    if !build.root.is_dir() {
        bail!("Source root `{}` is not a directory", build.root.display());
    }

    if !prepare_output(&build.output, build.force, confirm)? {
        log!("build"; "aborted, `{}` left untouched", build.output.display());
        return Ok(BuildOutcome::Declined);
    }

    let renderer = Renderer::new(
        TemplateEngine::new(&build.templates),
        DecoderRegistry::default(),
        build.marker.as_str(),
        build.template.as_str(),
    );
    let ignore = IgnoreMatcher::from_path(&build.ignore)?;
    let mut context = load_global(&build.context)?;

    let posts = blog::collect_posts(&BlogSource {
        root: &build.root,
        blog_dir: &build.blog,
        ignore: &ignore,
        decoders: renderer.decoders(),
        marker: renderer.marker(),
    })?;
    log!("blog"; "{} posts", posts.len());
    context.insert("posts".to_owned(), blog::posts_value(&posts));

    let hostname = context
        .get("hostname")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    let mut state = BuildState {
        context,
        posts,
        urls: UrlRegistry::new(&hostname, &build.index, &build.sitemap.hidden),
        failures: Vec::new(),
    };

    let mut summary = walk(config, &renderer, &ignore, &mut state)?;

    ensure_parent(&build.sitemap.path)?;
    write_sitemap(&state.urls, &build.sitemap.path)?;
    ensure_parent(&build.feed.path)?;
    summary.feed = build_feed(&state.context, &state.posts, build.feed_len, &build.feed.path)?;

    if !state.failures.is_empty() {
        return Err(BuildError::Failures(state.failures).into());
    }

    log!(
        "build";
        "done: {} converted, {} copied, {} ignored",
        summary.converted,
        summary.copied,
        summary.ignored
    );
    Ok(BuildOutcome::Built(summary))
}

/// Ask on the terminal whether an existing build directory may be deleted.
/// Only an explicit `yes` counts.
pub fn prompt_overwrite(output: &Path) -> Result<bool> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "`{}` exists, delete it? [yes/no] ", output.display())?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer")?;
    Ok(answer.trim() == "yes")
}

// ============================================================================
// Stages
// ============================================================================

/// Delete the build directory (if confirmed) and recreate it.
///
/// Returns false when the user declined.
fn prepare_output(
    output: &Path,
    force: bool,
    confirm: impl FnOnce(&Path) -> Result<bool>,
) -> Result<bool> {
    if output.exists() {
        if !force && !confirm(output)? {
            return Ok(false);
        }
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;
    Ok(true)
}

/// Walk the source root in file-name order, mirroring it into the build dir.
fn walk(
    config: &SiteConfig,
    renderer: &Renderer,
    ignore: &IgnoreMatcher,
    state: &mut BuildState,
) -> Result<BuildSummary> {
    let root = &config.build.root;
    let output = &config.build.output;
    let keep_going = config.build.keep_going;
    let mut summary = BuildSummary::default();

    let mut entries = WalkDir::new(root).min_depth(1).sort_by_file_name().into_iter();
    while let Some(entry) = entries.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                record(state, keep_going, &path, BuildError::io(path.clone(), err.into()))?;
                continue;
            }
        };

        let path = entry.path();
        let is_dir = entry.file_type().is_dir();
        let rel = path.strip_prefix(root).unwrap_or(path);

        // never walk into our own output
        if is_dir && path == output.as_path() {
            entries.skip_current_dir();
            continue;
        }

        if ignore.is_ignored(rel, is_dir) {
            log!("ignore"; "{}", rel.display());
            summary.ignored += 1;
            if is_dir {
                entries.skip_current_dir();
            }
            continue;
        }

        let result = if is_dir {
            let dst = output.join(rel);
            fs::create_dir_all(&dst).map_err(|err| BuildError::io(dst, err))
        } else {
            process_file(renderer, state, path, rel, output).map(|action| match action {
                FileAction::Converted => summary.converted += 1,
                FileAction::Copied => summary.copied += 1,
            })
        };

        if let Err(err) = result {
            record(state, keep_going, rel, err)?;
        }
    }

    Ok(summary)
}

/// Convert or copy one source file.
fn process_file(
    renderer: &Renderer,
    state: &mut BuildState,
    path: &Path,
    rel: &Path,
    output: &Path,
) -> BuildResult<FileAction> {
    let ext = slug::extension(path);
    let kind = renderer.classify(ext.as_deref());

    if let FileKind::Asset = kind {
        let dst = output.join(rel);
        fs::copy(path, &dst).map_err(|err| BuildError::io(path, err))?;
        log!("copy"; "{}", rel.display());
        return Ok(FileAction::Copied);
    }

    let out_rel = slug::html_path(rel);
    let raw = fs::read(path).map_err(|err| BuildError::io(path, err))?;
    let page = PageRef::new(&out_rel);
    let html = match kind {
        FileKind::Content(decoder) => {
            renderer.render_blocks(&raw, decoder, path, &state.context, page)?
        }
        _ => renderer.render_data(&raw, path, &state.context, page)?,
    };

    let dst = output.join(&out_rel);
    fs::write(&dst, html).map_err(|err| BuildError::io(&dst, err))?;
    log!("convert"; "{}", out_rel.display());

    state.urls.register(&slug::url_path(&out_rel));
    Ok(FileAction::Converted)
}

/// Abort with `err`, or log and collect it in keep-going mode.
fn record(state: &mut BuildState, keep_going: bool, rel: &Path, err: BuildError) -> Result<()> {
    if !keep_going {
        return Err(anyhow::Error::new(err).context(format!("Failed to build {}", rel.display())));
    }

    let message = format!("{:#}", anyhow::Error::new(err));
    log!("error"; "{}: {}", rel.display(), message);
    state.failures.push(FileFailure {
        path: rel.to_path_buf(),
        message,
    });
    Ok(())
}

fn ensure_parent(path: &Path) -> BuildResult<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err)),
        None => Ok(()),
    }
}
