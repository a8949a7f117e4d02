use crate::container::Container;
use crate::error::{Error, Result};
use crate::types::validate_entry_name;

/// rename the final segment of `path`
///
/// only siblings are checked for collisions. renaming an entry to its
/// current name succeeds without change.
pub fn rename(container: &mut Container, path: &str, new_name: &str) -> Result<()> {
    validate_entry_name(new_name)?;
    let id = container.table().resolve(path)?;

    let table = container.table();
    let parent = table.get(id).and_then(|e| e.parent);
    if table
        .children_of(parent)
        .any(|e| e.id() != id && e.name == new_name)
    {
        return Err(Error::EntryExists(new_name.to_string()));
    }

    if let Some(entry) = container.table_mut().get_mut(id) {
        tracing::debug!(from = %entry.name, to = new_name, "renamed entry");
        entry.name = new_name.to_string();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{add_file, create_dir};

    fn sample() -> Container {
        let mut c = Container::new();
        create_dir(&mut c, "/", "d").unwrap();
        add_file(&mut c, "d", "a.txt", b"a").unwrap();
        add_file(&mut c, "d", "b.txt", b"b").unwrap();
        c
    }

    #[test]
    fn test_rename_file() {
        let mut c = sample();
        let id = c.table().resolve("d/a.txt").unwrap();

        rename(&mut c, "d/a.txt", "renamed.txt").unwrap();

        assert_eq!(c.table().resolve("d/renamed.txt").unwrap(), id);
        assert!(c.table().resolve("d/a.txt").is_err());
        assert_eq!(c.file_content(id).unwrap(), b"a");
    }

    #[test]
    fn test_rename_directory_moves_subtree_path() {
        let mut c = sample();
        rename(&mut c, "d", "docs").unwrap();

        assert!(c.table().resolve("docs/a.txt").is_ok());
        assert!(c.table().resolve("docs/b.txt").is_ok());
    }

    #[test]
    fn test_rename_collision() {
        let mut c = sample();
        let before = c.clone();

        let result = rename(&mut c, "d/a.txt", "b.txt");

        assert!(matches!(result, Err(Error::EntryExists(n)) if n == "b.txt"));
        assert_eq!(c, before);
    }

    #[test]
    fn test_rename_to_same_name() {
        let mut c = sample();
        let before = c.clone();

        rename(&mut c, "d/a.txt", "a.txt").unwrap();
        assert_eq!(c, before);
    }

    #[test]
    fn test_rename_missing() {
        let mut c = sample();
        assert!(matches!(
            rename(&mut c, "d/zzz", "x"),
            Err(Error::PathNotFound(_))
        ));
    }

    #[test]
    fn test_rename_invalid_name() {
        let mut c = sample();
        assert!(matches!(
            rename(&mut c, "d/a.txt", "x/y"),
            Err(Error::InvalidEntryName(_))
        ));
    }

    #[test]
    fn test_rename_ignores_non_siblings() {
        let mut c = sample();
        create_dir(&mut c, "/", "other").unwrap();

        // a.txt exists under d, not at the root
        rename(&mut c, "other", "a.txt").unwrap();
        assert!(c.table().resolve("a.txt").is_ok());
    }
}
