use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::FileChangeType;
use crate::artifacts::status::status_info::StatusInfo;
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        let mut index = self.index_mut();
        index.rehydrate()?;

        let status_info = self.status_info(&index)?;
        drop(index);

        self.print_branches(&status_info)?;
        self.print_section(
            FileChangeType::Staged,
            status_info
                .staged_files()
                .iter()
                .map(|file| file.display().to_string()),
        )?;
        self.print_section(
            FileChangeType::Removed,
            status_info
                .removed_files()
                .iter()
                .map(|file| file.display().to_string()),
        )?;
        self.print_section(
            FileChangeType::Unstaged,
            status_info
                .workspace_changeset()
                .iter()
                .map(|(file, change)| format!("{} ({})", file.display(), change)),
        )?;
        self.print_section(
            FileChangeType::Untracked,
            status_info
                .untracked_files()
                .iter()
                .map(|file| file.display().to_string()),
        )?;

        Ok(())
    }

    fn print_branches(&self, status_info: &StatusInfo) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "=== Branches ===")?;
        for branch in status_info.branches() {
            if branch == status_info.current_branch() {
                writeln!(writer, "{}", format!("*{}", branch).green())?;
            } else {
                writeln!(writer, "{}", branch)?;
            }
        }
        writeln!(writer)?;

        Ok(())
    }

    fn print_section(
        &self,
        change_type: FileChangeType,
        lines: impl Iterator<Item = String>,
    ) -> anyhow::Result<()> {
        let mut writer = self.writer();
        let title: &str = (&change_type).into();

        writeln!(writer, "=== {} ===", title)?;
        for line in lines {
            writeln!(writer, "{}", change_type.colorize(&line))?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
