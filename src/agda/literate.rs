//! Literate Agda pages for a static site
//!
//! A `*.lagda.md` page is staged into its own directory, type-checked with
//! `agda --html --html-highlight=auto`, which leaves the markdown alone and only turns
//! code blocks into linked `<pre class="Agda">` HTML, and the generated fragment is
//! then post-processed so that its links work from the published page:
//!
//! - links into the page itself become plain anchors (`#123`),
//! - links into any other module point at the browsable standard library.
//!
//! Staging layout, for a page `posts/nat.lagda.md`:
//!
//! ```text
//! <root>/<stage_dir>/posts/nat.lagda.md/nat.lagda.md      staged copy
//! <root>/<stage_dir>/posts/nat.lagda.md/html/nat.md       agda output
//! <root>/<stage_dir>/posts/nat.lagda.md/nat.md            rewritten fragment
//! ```
//!
//! Pages are independent: a page that fails to check is reported and the others go on.

use crate::agda::config::RenderConfig;
use crate::agda::error::RenderError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const LITERATE_SUFFIX: &str = ".lagda.md";

static AGDA_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<pre class="Agda">.*?</pre>"#).expect("static pattern compiles")
});
static ANCHORED_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="([^"]*?)#(\d+)""#).expect("static pattern compiles"));

/// Whether `path` names a literate Agda markdown file
pub fn is_literate(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| {
            name.len() > LITERATE_SUFFIX.len() && name.ends_with(LITERATE_SUFFIX)
        })
}

/// `nat.lagda.md` -> `nat`
fn literate_stem(file_name: &str) -> &str {
    file_name.strip_suffix(LITERATE_SUFFIX).unwrap_or(file_name)
}

/// A page as handed over by the site generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Path relative to the site root, e.g. `posts/nat.lagda.md`
    pub relative_path: PathBuf,
    pub content: String,
}

impl Page {
    pub fn new(relative_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    /// Read a page from `root/relative_path`.
    pub fn load(
        root: impl AsRef<Path>,
        relative_path: impl Into<PathBuf>,
    ) -> Result<Self, RenderError> {
        let relative_path = relative_path.into();
        let path = root.as_ref().join(&relative_path);
        let content = fs::read_to_string(&path).map_err(|e| RenderError::io(&path, e))?;
        Ok(Self {
            relative_path,
            content,
        })
    }
}

/// A page copied into its staging directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPage {
    pub relative_path: PathBuf,
    /// Directory holding the staged copy; Agda runs from here
    pub dir: PathBuf,
    /// File name of the staged copy, e.g. `nat.lagda.md`
    pub file_name: String,
}

impl StagedPage {
    pub fn source_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Name of the HTML file Agda generates for this module, `nat.html`.
    pub fn own_html(&self) -> String {
        format!("{}.html", literate_stem(&self.file_name))
    }

    /// Name of the highlighted markdown fragment, `nat.md`.
    pub fn fragment_name(&self) -> String {
        format!("{}.md", literate_stem(&self.file_name))
    }

    /// Where the rewritten fragment is published.
    pub fn rendered_path(&self) -> PathBuf {
        self.dir.join(self.fragment_name())
    }
}

/// A successfully checked and rewritten page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub staged: StagedPage,
    pub content: String,
}

/// Outcome of one page in a batch
#[derive(Debug)]
pub struct PageOutcome {
    pub relative_path: PathBuf,
    pub result: Result<RenderedPage, RenderError>,
}

impl PageOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Drives the external Agda checker over literate pages
#[derive(Debug, Clone)]
pub struct AgdaRenderer {
    root: PathBuf,
    config: RenderConfig,
}

impl AgdaRenderer {
    /// `root` is the site root; the staging directory is resolved against it.
    pub fn new(root: impl Into<PathBuf>, config: RenderConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn stage_root(&self) -> PathBuf {
        self.root.join(&self.config.stage_dir)
    }

    /// Copy the page content into its staging directory.
    pub fn stage(&self, page: &Page) -> Result<StagedPage, RenderError> {
        if !is_literate(&page.relative_path) {
            return Err(RenderError::NotLiterate {
                path: page.relative_path.clone(),
            });
        }
        let file_name = page
            .relative_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| RenderError::NotLiterate {
                path: page.relative_path.clone(),
            })?;

        let dir = self.stage_root().join(&page.relative_path);
        fs::create_dir_all(&dir).map_err(|e| RenderError::io(&dir, e))?;

        let staged = StagedPage {
            relative_path: page.relative_path.clone(),
            dir,
            file_name,
        };
        let source = staged.source_path();
        fs::write(&source, &page.content).map_err(|e| RenderError::io(&source, e))?;
        tracing::debug!(path = %source.display(), "staged literate page");
        Ok(staged)
    }

    /// The checker invocation for a staged page.
    pub fn command(&self, staged: &StagedPage) -> Command {
        let mut command = Command::new(&self.config.agda);
        command
            .arg("--html")
            .arg(format!("--html-highlight={}", self.config.highlight))
            .arg(format!("--html-dir={}", self.config.html_dir))
            .arg(&staged.file_name)
            .current_dir(&staged.dir);
        command
    }

    /// Run Agda on a staged page and return the raw generated fragment.
    pub fn check(&self, staged: &StagedPage) -> Result<String, RenderError> {
        tracing::info!(page = %staged.relative_path.display(), "typechecking Agda");

        let output = self
            .command(staged)
            .output()
            .map_err(|source| RenderError::Spawn {
                program: self.config.agda.clone(),
                source,
            })?;

        if !output.status.success() {
            tracing::warn!(
                page = %staged.relative_path.display(),
                status = %output.status,
                "KO"
            );
            return Err(RenderError::CheckFailed {
                path: staged.relative_path.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let generated = staged
            .dir
            .join(&self.config.html_dir)
            .join(staged.fragment_name());
        let content =
            fs::read_to_string(&generated).map_err(|e| RenderError::io(&generated, e))?;
        tracing::info!(page = %staged.relative_path.display(), "OK");
        Ok(content)
    }

    /// Stage, check and rewrite a single page.
    pub fn render(&self, page: &Page) -> Result<RenderedPage, RenderError> {
        let staged = self.stage(page)?;
        let raw = self.check(&staged)?;
        let content = rewrite_links(&raw, &staged.own_html(), &self.config.stdlib_root);
        Ok(RenderedPage { staged, content })
    }

    /// Render every page, collecting one outcome per page.
    pub fn render_pages<'a, I>(&self, pages: I) -> Vec<PageOutcome>
    where
        I: IntoIterator<Item = &'a Page>,
    {
        pages
            .into_iter()
            .map(|page| PageOutcome {
                relative_path: page.relative_path.clone(),
                result: self.render(page),
            })
            .collect()
    }

    /// Write a rendered fragment next to its staged copy.
    pub fn publish(&self, rendered: &RenderedPage) -> Result<PathBuf, RenderError> {
        let path = rendered.staged.rendered_path();
        fs::write(&path, &rendered.content).map_err(|e| RenderError::io(&path, e))?;
        Ok(path)
    }
}

/// Make the links of an Agda-generated fragment usable from the published page.
///
/// Inside `<pre class="Agda">` blocks, `href="X#N"` becomes `href="#N"` when `X` is
/// `own_html` and `href="<stdlib_root>/X#N"` otherwise. Outside those blocks only links
/// to `own_html` are touched. Links without a target file (`href="#N"`) are kept.
pub fn rewrite_links(content: &str, own_html: &str, stdlib_root: &str) -> String {
    let root = stdlib_root.trim_end_matches('/');

    let in_blocks = AGDA_BLOCK.replace_all(content, |block: &Captures| {
        ANCHORED_HREF
            .replace_all(&block[0], |href: &Captures| {
                let target = &href[1];
                let anchor = &href[2];
                if target == own_html {
                    format!("href=\"#{}\"", anchor)
                } else if target.is_empty() {
                    href[0].to_string()
                } else {
                    format!("href=\"{}/{}#{}\"", root, target, anchor)
                }
            })
            .into_owned()
    });

    ANCHORED_HREF
        .replace_all(&in_blocks, |href: &Captures| {
            if &href[1] == own_html {
                format!("href=\"#{}\"", &href[2])
            } else {
                href[0].to_string()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agda::config::load_defaults;
    use std::ffi::OsStr;

    const STDLIB: &str = "https://agda.github.io/agda-stdlib/v1.5";

    fn renderer(root: &Path) -> AgdaRenderer {
        AgdaRenderer::new(root, load_defaults().unwrap().render)
    }

    #[test]
    fn test_is_literate() {
        assert!(is_literate("posts/nat.lagda.md"));
        assert!(is_literate(Path::new("nat.lagda.md")));
        assert!(!is_literate("nat.agda"));
        assert!(!is_literate("nat.md"));
        assert!(!is_literate(".lagda.md"));
    }

    #[test]
    fn test_staged_names() {
        let staged = StagedPage {
            relative_path: PathBuf::from("posts/nat.lagda.md"),
            dir: PathBuf::from("/site/.agda-html/posts/nat.lagda.md"),
            file_name: "nat.lagda.md".to_string(),
        };
        assert_eq!(staged.own_html(), "nat.html");
        assert_eq!(staged.fragment_name(), "nat.md");
        assert_eq!(
            staged.source_path(),
            PathBuf::from("/site/.agda-html/posts/nat.lagda.md/nat.lagda.md")
        );
        assert_eq!(
            staged.rendered_path(),
            PathBuf::from("/site/.agda-html/posts/nat.lagda.md/nat.md")
        );
    }

    #[test]
    fn test_stage_writes_copy() {
        let root = tempfile::tempdir().unwrap();
        let page = Page::new("posts/nat.lagda.md", "# Nat\n");
        let staged = renderer(root.path()).stage(&page).unwrap();

        assert_eq!(
            staged.dir,
            root.path().join(".agda-html").join("posts/nat.lagda.md")
        );
        assert_eq!(fs::read_to_string(staged.source_path()).unwrap(), "# Nat\n");
    }

    #[test]
    fn test_stage_rejects_plain_markdown() {
        let root = tempfile::tempdir().unwrap();
        let err = renderer(root.path())
            .stage(&Page::new("about.md", "hi"))
            .unwrap_err();
        assert!(matches!(err, RenderError::NotLiterate { .. }));
    }

    #[test]
    fn test_command_line() {
        let root = tempfile::tempdir().unwrap();
        let renderer = renderer(root.path());
        let staged = renderer.stage(&Page::new("nat.lagda.md", "")).unwrap();
        let command = renderer.command(&staged);

        assert_eq!(command.get_program(), OsStr::new("agda"));
        let args: Vec<String> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "--html",
                "--html-highlight=auto",
                "--html-dir=html",
                "nat.lagda.md"
            ]
        );
        assert_eq!(command.get_current_dir(), Some(staged.dir.as_path()));
    }

    #[test]
    fn test_missing_checker_is_spawn_error() {
        let root = tempfile::tempdir().unwrap();
        let mut config = load_defaults().unwrap().render;
        config.agda = "/definitely/not/agda".to_string();
        let renderer = AgdaRenderer::new(root.path(), config);

        let err = renderer
            .render(&Page::new("nat.lagda.md", ""))
            .unwrap_err();
        assert!(matches!(err, RenderError::Spawn { .. }));
    }

    #[test]
    fn test_rewrite_links_in_agda_blocks() {
        let content = concat!(
            "# Title\n",
            "<pre class=\"Agda\">",
            "<a id=\"1\" href=\"nat.html#1\">ℕ</a> ",
            "<a href=\"Agda.Builtin.Nat.html#203\">suc</a>",
            "</pre>\n"
        );
        let rewritten = rewrite_links(content, "nat.html", STDLIB);
        assert_eq!(
            rewritten,
            concat!(
                "# Title\n",
                "<pre class=\"Agda\">",
                "<a id=\"1\" href=\"#1\">ℕ</a> ",
                "<a href=\"https://agda.github.io/agda-stdlib/v1.5/Agda.Builtin.Nat.html#203\">suc</a>",
                "</pre>\n"
            )
        );
    }

    #[test]
    fn test_rewrite_links_outside_blocks() {
        let content = "[see](nat.html#5) <a href=\"nat.html#5\">x</a> <a href=\"Other.html#2\">y</a>";
        let rewritten = rewrite_links(content, "nat.html", STDLIB);
        assert_eq!(
            rewritten,
            "[see](nat.html#5) <a href=\"#5\">x</a> <a href=\"Other.html#2\">y</a>"
        );
    }

    #[test]
    fn test_rewrite_links_spanning_lines() {
        let content = "<pre class=\"Agda\">\n<a href=\"A.html#1\">a</a>\n</pre>";
        let rewritten = rewrite_links(content, "nat.html", "https://example.org/lib/");
        assert_eq!(
            rewritten,
            "<pre class=\"Agda\">\n<a href=\"https://example.org/lib/A.html#1\">a</a>\n</pre>"
        );
    }

    #[test]
    fn test_rewrite_keeps_bare_anchors() {
        let content = "<pre class=\"Agda\"><a href=\"#7\">x</a></pre>";
        assert_eq!(rewrite_links(content, "nat.html", STDLIB), content);
    }
}
