#[cfg(all(unix, feature = "pdf-import"))]
mod unix {
    use docweave_babel::formats::pdf::{pdf_bytes_to_markdown, pdf_to_markdown};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    /// A `pdftotext` stand-in that writes fixed, line-wrapped text to its output argument.
    fn write_stub_pdftotext() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let script_path = dir.path().join("pdftotext");
        let script = r#"#!/bin/sh
OUTPUT=""
for arg in "$@"; do
  OUTPUT="$arg"
done
if [ -z "$OUTPUT" ]; then
  echo "missing output" >&2
  exit 1
fi
printf 'Quarterly re-\nport for the\nteam.\n\nSecond page\f' > "$OUTPUT"
exit 0
"#;
        fs::write(&script_path, script).unwrap();
        let mut perms = fs::metadata(&script_path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script_path, perms).unwrap();
        dir
    }

    #[test]
    fn pdf_conversion_uses_pdftotext_stub() {
        let stub_dir = write_stub_pdftotext();
        let prev = std::env::var_os("PATH");
        let mut path = std::ffi::OsString::from(stub_dir.path());
        if let Some(prev) = &prev {
            path.push(":");
            path.push(prev);
        }
        std::env::set_var("PATH", &path);

        let work = tempdir().unwrap();
        let pdf = work.path().join("report.pdf");
        fs::write(&pdf, b"%PDF-1.7\n%%EOF\n").unwrap();

        let from_file = pdf_to_markdown(&pdf);
        let from_bytes = pdf_bytes_to_markdown(b"%PDF-1.7\n%%EOF\n");

        match prev {
            Some(prev) => std::env::set_var("PATH", prev),
            None => std::env::remove_var("PATH"),
        }

        let expected = "Quarterly report for the team.\n\nSecond page\n";
        assert_eq!(from_file.unwrap(), expected);
        assert_eq!(from_bytes.unwrap(), expected);
    }
}
