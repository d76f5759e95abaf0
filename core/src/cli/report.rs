use crate::api::DatasetIndex;
use crate::types::DatasetPath;
use std::fmt;
use std::path::Path;

fn relative<'a>(root: &Path, path: &'a DatasetPath) -> std::path::Display<'a> {
    path.path
        .strip_prefix(root)
        .unwrap_or(path.path.as_path())
        .display()
}

/// Text report formatter for dataset pairings and run groups
pub struct TextReport<'a> {
    index: &'a DatasetIndex,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(index: &'a DatasetIndex) -> Self {
        Self { index }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.index.root();

        writeln!(f, "PET/Anatomical Pairings")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;

        if self.index.pairings().is_empty() {
            writeln!(f, "No PET images found")?;
            writeln!(f)?;
        }

        for (subject, pairing) in self.index.pairings() {
            writeln!(f, "sub-{}", subject)?;
            for (pet, paired) in pairing.iter() {
                writeln!(f, "  {}", relative(root, pet))?;
                writeln!(
                    f,
                    "    Anatomical: {} ({})",
                    relative(root, &paired.anat),
                    paired.rule
                )?;
                if let Some(group) = self.index.run_group_for(pet) {
                    if group.is_multi_run() {
                        writeln!(f, "    Runs:       {}", group.len())?;
                    }
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "Run Groups")?;
        writeln!(f, "----------")?;
        for group in self.index.run_groups().multi_run() {
            writeln!(f, "{}", group.template())?;
            for path in group.paths() {
                writeln!(f, "  {}", relative(root, path))?;
            }
        }
        writeln!(
            f,
            "{} groups, {} multi-run",
            self.index.run_groups().len(),
            self.index.run_groups().multi_run().count()
        )?;

        Ok(())
    }
}

/// Tab-separated `pet<TAB>anat` lines
pub struct PathsReport<'a> {
    index: &'a DatasetIndex,
}

impl<'a> PathsReport<'a> {
    pub fn new(index: &'a DatasetIndex) -> Self {
        Self { index }
    }
}

impl<'a> fmt::Display for PathsReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pairing in self.index.pairings().values() {
            for (pet, paired) in pairing.iter() {
                writeln!(f, "{}\t{}", pet.path.display(), paired.anat.path.display())?;
            }
        }
        Ok(())
    }
}
