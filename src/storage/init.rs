//! Storage initialization
//!
//! Handles first-run setup and seeding a fresh catalog with example books.

use crate::error::{LibraryError, LibraryResult};
use crate::models::Book;

use super::Storage;

/// Example books offered to an empty catalog: (title, author, isbn, genre)
const EXAMPLE_BOOKS: &[(&str, &str, &str, &str)] = &[
    ("Cien años de soledad", "Gabriel García Márquez", "978-0-06-088328-7", "Novela"),
    ("Don Quijote de la Mancha", "Miguel de Cervantes", "978-84-376-0494-7", "Clásico"),
    ("El Principito", "Antoine de Saint-Exupéry", "978-0-15-601219-5", "Infantil"),
    ("1984", "George Orwell", "978-0-451-52493-5", "Ciencia Ficción"),
    ("Rayuela", "Julio Cortázar", "978-84-376-0602-6", "Novela"),
    ("La sombra del viento", "Carlos Ruiz Zafón", "978-84-08-04171-3", "Misterio"),
    ("Crónica de una muerte anunciada", "Gabriel García Márquez", "978-84-376-0781-8", "Novela"),
    ("Harry Potter y la piedra filosofal", "J.K. Rowling", "978-84-7888-445-8", "Fantasía"),
];

/// Initialize storage for a fresh installation
///
/// Creates the directory layout and, when `seed` is set and the catalog is
/// empty, adds the example books. Returns how many books were seeded.
pub fn initialize_storage(storage: &Storage, seed: bool) -> LibraryResult<usize> {
    storage.paths().ensure_directories()?;

    if !seed {
        return Ok(0);
    }

    let _guard = storage.lock_writes()?;
    if storage.catalog.count()? > 0 {
        return Ok(0);
    }

    let mut seeded = 0;
    for (title, author, isbn, genre) in EXAMPLE_BOOKS {
        match storage
            .catalog
            .insert(Book::with_genre(*isbn, *title, *author, *genre))
        {
            Ok(()) => seeded += 1,
            Err(LibraryError::DuplicateIsbn(_)) => {}
            Err(e) => return Err(e),
        }
    }

    storage.catalog.save()?;
    tracing::info!(seeded, "seeded catalog with example books");
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibraryPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibraryPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_seeds_empty_catalog() {
        let (_temp_dir, storage) = create_test_storage();

        let seeded = initialize_storage(&storage, true).unwrap();
        assert_eq!(seeded, EXAMPLE_BOOKS.len());
        assert!(storage.paths().catalog_file().exists());
        assert!(storage.catalog.get_all().unwrap().iter().all(Book::is_available));
    }

    #[test]
    fn test_does_not_seed_when_disabled() {
        let (_temp_dir, storage) = create_test_storage();

        assert_eq!(initialize_storage(&storage, false).unwrap(), 0);
        assert_eq!(storage.catalog.count().unwrap(), 0);
    }

    #[test]
    fn test_does_not_seed_non_empty_catalog() {
        let (_temp_dir, storage) = create_test_storage();
        storage.catalog.insert(Book::new("1", "Mine", "Me")).unwrap();

        assert_eq!(initialize_storage(&storage, true).unwrap(), 0);
        assert_eq!(storage.catalog.count().unwrap(), 1);
    }
}
