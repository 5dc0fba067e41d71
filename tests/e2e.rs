//! End-to-end tests against the live Mistral API.
//!
//! Gated behind the `E2E_ENABLED` environment variable (and a real
//! `MISTRAL_API_KEY`) so they never run in CI by accident — every test
//! spends API credits.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use ocr2md::{convert, convert_to_file, MistralOcr};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Engine for gated tests, or `None` with a SKIP note when the gate is shut.
fn e2e_engine() -> Option<MistralOcr> {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
        return None;
    }
    if std::env::var("MISTRAL_API_KEY").is_err() {
        println!("SKIP — MISTRAL_API_KEY not set");
        return None;
    }
    Some(MistralOcr::from_env().expect("engine construction must succeed"))
}

/// A complete single-page PDF with one line of Helvetica text, built with a
/// correct xref table so strict parsers accept it. Keeps the test
/// self-contained: no fixture files to download.
fn tiny_pdf() -> Vec<u8> {
    let text_stream = "BT /F1 24 Tf 72 720 Td (Converted by an integration test) Tj ET";
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            text_stream.len(),
            text_stream
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    pdf.push_str("0000000000 65535 f \n");
    for offset in &offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    pdf.into_bytes()
}

/// Assert the markdown passes basic quality checks.
fn assert_markdown_quality(md: &str, context: &str) {
    assert!(!md.trim().is_empty(), "[{context}] Markdown is empty");

    // Every assembled document ends with the page terminator.
    assert!(
        md.ends_with("\n\n"),
        "[{context}] Markdown must end with a blank line"
    );

    // No invisible Unicode junk
    let invisible = ['\u{200B}', '\u{FEFF}', '\u{200C}', '\u{200D}', '\u{2060}'];
    for ch in invisible {
        assert!(
            !md.contains(ch),
            "[{context}] Output contains invisible char U+{:04X}",
            ch as u32
        );
    }

    println!("[{context}] ✓  {} bytes, quality checks passed", md.len());
}

// ── Fixture sanity (no network, always runs) ─────────────────────────────────

#[test]
fn tiny_pdf_is_well_formed() {
    let bytes = tiny_pdf();
    let text = String::from_utf8(bytes).expect("generator emits ASCII only");

    assert!(text.starts_with("%PDF-1.4\n"));
    assert!(text.contains("/Type /Catalog"));
    assert!(text.contains("startxref"));
    assert!(text.trim_end().ends_with("%%EOF"));

    // The xref offset must point at the literal "xref" keyword.
    let offset: usize = text
        .lines()
        .rev()
        .nth(1)
        .expect("startxref value line")
        .parse()
        .expect("numeric xref offset");
    assert!(text[offset..].starts_with("xref"));
}

// ── Live conversion tests (network + API key required) ───────────────────────

/// Remote mode: the URL goes to the API verbatim and the service fetches
/// the document itself.
#[tokio::test]
async fn e2e_convert_remote_arxiv_url() {
    let Some(engine) = e2e_engine() else { return };

    let markdown = convert("https://arxiv.org/pdf/2201.04234", &engine)
        .await
        .expect("remote conversion must succeed");

    assert_markdown_quality(&markdown, "arxiv-url");
    let excerpt: String = markdown.chars().take(600).collect();
    println!("--- BEGIN OUTPUT (first 600 chars) ---\n{excerpt}\n--- END OUTPUT ---");
}

/// Local mode: exercises the whole upload handshake (multipart upload,
/// signed URL, OCR) against the real service.
#[tokio::test]
async fn e2e_upload_local_file() {
    let Some(engine) = e2e_engine() else { return };

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("e2e_sample.pdf");
    std::fs::write(&path, tiny_pdf()).expect("write fixture");

    let markdown = convert(path.to_str().expect("utf-8 path"), &engine)
        .await
        .expect("local conversion must succeed");

    assert_markdown_quality(&markdown, "local-upload");
    assert!(
        markdown.to_lowercase().contains("integration"),
        "OCR should read the fixture's text, got:\n{markdown}"
    );
}

/// File output: an existing file at the output path is replaced, not
/// appended to.
#[tokio::test]
async fn e2e_convert_to_file_replaces_output() {
    let Some(engine) = e2e_engine() else { return };

    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("e2e_sample.pdf");
    std::fs::write(&input, tiny_pdf()).expect("write fixture");

    let output = dir.path().join("ocr_output.md");
    std::fs::write(&output, "stale content from a previous run").expect("seed output");

    convert_to_file(input.to_str().expect("utf-8 path"), &output, &engine)
        .await
        .expect("conversion to file must succeed");

    let written = std::fs::read_to_string(&output).expect("read output");
    assert!(!written.contains("stale content"));
    assert_markdown_quality(&written, "to-file");
}
