#![allow(dead_code)]

pub mod command;
pub mod file;

const TMPDIR: &str = "../playground";

pub fn redirect_temp_dir() {
    unsafe {
        std::env::set_var("TMPDIR", TMPDIR);
    }

    // Ensure the TMPDIR exists
    if !std::path::Path::new(TMPDIR).exists() {
        std::fs::create_dir_all(TMPDIR).expect("Failed to create TMPDIR");
    }
}

/// Sections of `twig status` output, split on the `=== Title ===` headers
pub fn status_sections(output: &str) -> Vec<(String, Vec<String>)> {
    let mut sections: Vec<(String, Vec<String>)> = Vec::new();

    for line in output.lines() {
        if let Some(title) = line
            .strip_prefix("=== ")
            .and_then(|rest| rest.strip_suffix(" ==="))
        {
            sections.push((title.to_string(), Vec::new()));
        } else if !line.is_empty() {
            if let Some((_, lines)) = sections.last_mut() {
                lines.push(line.to_string());
            }
        }
    }

    sections
}

/// Lines of one `twig status` section
pub fn status_section(output: &str, title: &str) -> Vec<String> {
    status_sections(output)
        .into_iter()
        .find(|(name, _)| name == title)
        .map(|(_, lines)| lines)
        .unwrap_or_else(|| panic!("status output has no {title:?} section:\n{output}"))
}
