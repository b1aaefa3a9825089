//! MIME type guessing from a media source URL

use url::Url;

/// Base used to resolve relative sources such as `videos/clip.mp4`
const RELATIVE_BASE: &str = "http://localhost/";

/// Guess the MIME type of `source` from the extension of its path.
///
/// Query strings and fragments are ignored. Returns `None` for unknown
/// extensions and unparseable sources.
pub fn guess(source: &str) -> Option<&'static str> {
    let url = Url::parse(source)
        .or_else(|_| Url::parse(RELATIVE_BASE).and_then(|base| base.join(source)))
        .ok()?;
    let file_name = url.path_segments()?.next_back()?;
    let (_, extension) = file_name.rsplit_once('.')?;

    mime_guess::from_ext(&extension.to_ascii_lowercase()).first_raw()
}
