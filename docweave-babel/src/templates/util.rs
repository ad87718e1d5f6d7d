use pathdiff::diff_paths;
use std::path::Path;

/// Path of `target` as written inside a document stored in `document_dir`.
///
/// Relative results always carry an explicit `./` or `../` prefix.
pub(crate) fn normalize_path(target: &Path, document_dir: Option<&Path>) -> String {
    let candidate = match document_dir {
        Some(base) => diff_paths(target, base).unwrap_or_else(|| target.to_path_buf()),
        None => target.to_path_buf(),
    };

    let converted = candidate.to_string_lossy().replace('\\', "/");
    if converted.starts_with("./")
        || converted.starts_with("../")
        || converted.starts_with('/')
        || converted.contains(':')
    {
        converted
    } else {
        format!("./{converted}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_directory_uses_parent_prefix() {
        let path = normalize_path(Path::new("/a/img/x.svg"), Some(Path::new("/a/docs")));
        assert_eq!(path, "../img/x.svg");
    }

    #[test]
    fn bare_relative_path_gains_dot_prefix() {
        assert_eq!(normalize_path(Path::new("x.png"), None), "./x.png");
    }
}
