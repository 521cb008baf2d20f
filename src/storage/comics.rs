use redb::{ReadableTable, WriteTransaction};

use super::db::{index_ids, index_insert, index_remove, read_index_ids, Database, DatabaseError};
use super::models::{Chapter, Comic, ComicStatus, Tag};
use super::tables::*;

impl Database {
    // ========================================================================
    // Comic operations
    // ========================================================================

    /// Store a comic record and keep the creator index current
    pub fn put_comic(&self, comic: &Comic) -> Result<(), DatabaseError> {
        let write_txn = self.begin_write()?;
        write_comic(&write_txn, comic)?;
        write_txn.commit()?;
        Ok(())
    }

    /// Get a comic by its UUID
    pub fn get_comic(&self, id: &str) -> Result<Option<Comic>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(COMICS)?;

        match table.get(id)? {
            Some(data) => {
                let comic: Comic = rmp_serde::from_slice(data.value())?;
                Ok(Some(comic))
            }
            None => Ok(None),
        }
    }

    /// All comics, most recently updated first
    pub fn list_comics(&self) -> Result<Vec<Comic>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(COMICS)?;

        let mut comics = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let comic: Comic = rmp_serde::from_slice(value.value())?;
            comics.push(comic);
        }

        comics.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(comics)
    }

    pub fn list_comics_by_status(&self, status: ComicStatus) -> Result<Vec<Comic>, DatabaseError> {
        Ok(self
            .list_comics()?
            .into_iter()
            .filter(|c| c.status == status)
            .collect())
    }

    /// Comics owned by a creator (uses the creator index)
    pub fn list_comics_by_creator(&self, creator_id: &str) -> Result<Vec<Comic>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let comic_ids = read_index_ids(&read_txn, CREATOR_COMICS, creator_id)?;
        let table = read_txn.open_table(COMICS)?;

        let mut comics = Vec::new();
        for comic_id in comic_ids {
            if let Some(data) = table.get(comic_id.as_str())? {
                let comic: Comic = rmp_serde::from_slice(data.value())?;
                comics.push(comic);
            }
        }

        comics.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(comics)
    }

    /// Delete a comic together with its chapters and index entries
    pub fn delete_comic(&self, id: &str) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let creator_id: Option<String> = {
            let table = write_txn.open_table(COMICS)?;
            let result = match table.get(id)? {
                Some(data) => {
                    let comic: Comic = rmp_serde::from_slice(data.value())?;
                    Some(comic.creator_id)
                }
                None => None,
            };
            result
        };

        let deleted = match creator_id {
            Some(creator_id) => {
                {
                    let mut table = write_txn.open_table(COMICS)?;
                    table.remove(id)?;
                }
                index_remove(&write_txn, CREATOR_COMICS, &creator_id, id)?;

                let chapter_ids = index_ids(&write_txn, COMIC_CHAPTERS, id)?;
                {
                    let mut chapters = write_txn.open_table(CHAPTERS)?;
                    for chapter_id in &chapter_ids {
                        chapters.remove(chapter_id.as_str())?;
                    }
                }
                {
                    let mut index = write_txn.open_table(COMIC_CHAPTERS)?;
                    index.remove(id)?;
                }
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(deleted)
    }

    /// Persist a comic and a set of its chapters in a single transaction
    pub fn save_comic_with_chapters(
        &self,
        comic: &Comic,
        chapters: &[Chapter],
    ) -> Result<(), DatabaseError> {
        let write_txn = self.begin_write()?;
        write_comic(&write_txn, comic)?;
        for chapter in chapters {
            debug_assert_eq!(chapter.comic_id, comic.id, "chapter belongs to another comic");
            write_chapter(&write_txn, chapter)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    // ========================================================================
    // Chapter operations
    // ========================================================================

    /// Store a chapter and register it under its comic
    pub fn put_chapter(&self, chapter: &Chapter) -> Result<(), DatabaseError> {
        let write_txn = self.begin_write()?;
        write_chapter(&write_txn, chapter)?;
        write_txn.commit()?;
        Ok(())
    }

    pub fn get_chapter(&self, id: &str) -> Result<Option<Chapter>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(CHAPTERS)?;

        match table.get(id)? {
            Some(data) => {
                let chapter: Chapter = rmp_serde::from_slice(data.value())?;
                Ok(Some(chapter))
            }
            None => Ok(None),
        }
    }

    /// All chapters of a comic ordered by chapter number
    pub fn get_chapters_for_comic(&self, comic_id: &str) -> Result<Vec<Chapter>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let chapter_ids = read_index_ids(&read_txn, COMIC_CHAPTERS, comic_id)?;
        let table = read_txn.open_table(CHAPTERS)?;

        let mut chapters = Vec::new();
        for chapter_id in chapter_ids {
            if let Some(data) = table.get(chapter_id.as_str())? {
                let chapter: Chapter = rmp_serde::from_slice(data.value())?;
                chapters.push(chapter);
            }
        }

        chapters.sort_by_key(|c| c.chapter_number);
        Ok(chapters)
    }

    // ========================================================================
    // Tag operations
    // ========================================================================

    pub fn put_tag(&self, tag: &Tag) -> Result<(), DatabaseError> {
        debug_assert!(!tag.slug.is_empty(), "tag slug must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(TAGS)?;
            let data = rmp_serde::to_vec_named(tag)?;
            table.insert(tag.slug.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get_tag(&self, slug: &str) -> Result<Option<Tag>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(TAGS)?;

        match table.get(slug)? {
            Some(data) => {
                let tag: Tag = rmp_serde::from_slice(data.value())?;
                Ok(Some(tag))
            }
            None => Ok(None),
        }
    }

    /// Resolve a list of slugs, skipping any that no longer exist
    pub fn get_tags(&self, slugs: &[String]) -> Result<Vec<Tag>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(TAGS)?;

        let mut tags = Vec::with_capacity(slugs.len());
        for slug in slugs {
            if let Some(data) = table.get(slug.as_str())? {
                let tag: Tag = rmp_serde::from_slice(data.value())?;
                tags.push(tag);
            }
        }
        Ok(tags)
    }
}

fn write_comic(txn: &WriteTransaction, comic: &Comic) -> Result<(), DatabaseError> {
    debug_assert!(!comic.id.is_empty(), "comic id must not be empty");

    {
        let mut table = txn.open_table(COMICS)?;
        let data = rmp_serde::to_vec_named(comic)?;
        table.insert(comic.id.as_str(), data.as_slice())?;
    }
    index_insert(txn, CREATOR_COMICS, &comic.creator_id, &comic.id)
}

fn write_chapter(txn: &WriteTransaction, chapter: &Chapter) -> Result<(), DatabaseError> {
    debug_assert!(!chapter.id.is_empty(), "chapter id must not be empty");

    {
        let mut table = txn.open_table(CHAPTERS)?;
        let data = rmp_serde::to_vec_named(chapter)?;
        table.insert(chapter.id.as_str(), data.as_slice())?;
    }
    index_insert(txn, COMIC_CHAPTERS, &chapter.comic_id, &chapter.id)
}
