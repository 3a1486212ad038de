// Turning typed text into something a tab can load
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_SEARCH_ENGINE: &str = "https://duckduckgo.com/?q={}";

/// What a tab shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Blank,
    Web(Url),
    File(PathBuf),
}

impl Target {
    /// Short label for the tab bar.
    pub fn label(&self) -> String {
        match self {
            Target::Blank => "new tab".to_string(),
            Target::Web(url) => url
                .host_str()
                .map(|h| h.trim_start_matches("www.").to_string())
                .unwrap_or_else(|| url.to_string()),
            Target::File(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("/")
                .to_string(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Blank => f.write_str("about:blank"),
            Target::Web(url) => write!(f, "{url}"),
            Target::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Interpret user text as an address, a local file or a search query.
///
/// Text with a dot and no spaces is taken as a host name and gets
/// `https://www.` in front when it has no scheme. Anything else is sent to
/// `search_engine`, a template where `{}` is replaced by the query.
pub fn create_url(text: &str, search_engine: &str) -> Result<Target, url::ParseError> {
    let text = text.trim();
    if text.is_empty() || text == "about:blank" {
        return Ok(Target::Blank);
    }

    if text.contains("://") || text.starts_with("about:") {
        let url = Url::parse(text)?;
        if url.scheme() == "file" {
            if let Ok(path) = url.to_file_path() {
                return Ok(Target::File(path));
            }
        }
        return Ok(Target::Web(url));
    }

    if looks_like_path(text) {
        let path = expand_home(text);
        if path.is_file() {
            return Ok(Target::File(path));
        }
    }

    if text.contains('.') && !text.contains(' ') {
        let host = if text.starts_with("www.") {
            text.to_string()
        } else {
            format!("www.{text}")
        };
        if let Ok(url) = Url::parse(&format!("https://{host}")) {
            return Ok(Target::Web(url));
        }
    }

    let query: String = url::form_urlencoded::byte_serialize(text.as_bytes()).collect();
    let template = if search_engine.contains("{}") {
        search_engine
    } else {
        DEFAULT_SEARCH_ENGINE
    };
    Url::parse(&template.replace("{}", &query)).map(Target::Web)
}

fn looks_like_path(text: &str) -> bool {
    text.starts_with('/') || text.starts_with("./") || text.starts_with("../") || text.starts_with('~')
}

fn expand_home(text: &str) -> PathBuf {
    match text.strip_prefix('~') {
        Some(rest) => directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(rest.trim_start_matches('/')))
            .unwrap_or_else(|| Path::new(text).to_path_buf()),
        None => PathBuf::from(text),
    }
}
