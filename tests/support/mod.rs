//! Shared helpers for the binary-level tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub const INCIDENT_ROWS: &[&str] = &[
    "Daily Incident Summary (Public)",
    "Date / Time Incident Number Location Nature Incident ORI",
    "01/02/2024 0:04 2024-00000001 1234 MAIN ST Traffic Stop OK0140200",
    "01/02/2024 0:10 2024-00000002 36TH AVE NW / ROBINSON ST Alarm OK0140200",
    "01/02/2024 0:15 2024-00000003 500 E GRAY ST Welfare Check 14005",
];

pub fn normanpd_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    path.pop();
    path.push("normanpd");
    path
}

/// Temp workspace with a config pointing db, uploads and bind inside it.
pub fn setup_test_env(port: u16) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[db]
path = "{root}/data/normanpd.sqlite"

[server]
bind = "127.0.0.1:{port}"

[storage]
upload_dir = "{root}/uploads"

[fetch]
timeout_secs = 10
"#,
        root = root.display(),
        port = port
    );

    let config_path = config_dir.join("normanpd.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

pub fn run_normanpd(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = normanpd_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run normanpd binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn pdf_escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Single-page PDF with one text line per entry, top to bottom.
/// Body first, then an xref with correct byte offsets so pdf-extract can parse it.
pub fn minimal_pdf(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT /F1 9 Tf 20 760 Td\n");
    for line in lines {
        content.push_str(&format!("({}) Tj 0 -14 Td\n", pdf_escape(line)));
    }
    content.push_str("ET");

    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let o1 = out.len();
    out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
    let o2 = out.len();
    out.extend_from_slice(b"2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n");
    let o3 = out.len();
    out.extend_from_slice(b"3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj\n");
    let o4 = out.len();
    out.extend_from_slice(
        format!(
            "4 0 obj << /Length {} >> stream\n{}\nendstream endobj\n",
            content.len(),
            content
        )
        .as_bytes(),
    );
    let o5 = out.len();
    out.extend_from_slice(
        b"5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n",
    );
    let xref_start = out.len();
    out.extend_from_slice(b"xref\n0 6\n");
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in [o1, o2, o3, o4, o5] {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(b"trailer << /Size 6 /Root 1 0 R >>\nstartxref\n");
    out.extend_from_slice(format!("{}\n", xref_start).as_bytes());
    out.extend_from_slice(b"%%EOF\n");
    out
}

pub fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
