//! File metadata records
//!
//! Saving a file charges its size to the owner's `bytes_data_left`,
//! removing it refunds the same amount.

use super::{Database, FileRepository, StoredFile};
use crate::error::AppError;
use async_trait::async_trait;
use tracing::debug;

const FILE_COLUMNS: &str = "id, chat_bot_id, owner_id, openai_file_id, filename, file_size";

#[async_trait]
impl FileRepository for Database {
    async fn file(&self, id: i64, owner_id: i64) -> Result<StoredFile, AppError> {
        let query = format!(
            "SELECT {} FROM files WHERE id = ? AND owner_id = ?",
            FILE_COLUMNS
        );
        sqlx::query_as::<_, StoredFile>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("file {} does not exist", id)))
    }

    async fn chat_bot_files(
        &self,
        chat_bot_id: i64,
        owner_id: i64,
    ) -> Result<Vec<StoredFile>, AppError> {
        let query = format!(
            "SELECT {} FROM files WHERE chat_bot_id = ? AND owner_id = ? ORDER BY id",
            FILE_COLUMNS
        );
        let files = sqlx::query_as::<_, StoredFile>(&query)
            .bind(chat_bot_id)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to fetch files: {}", e)))?;

        Ok(files)
    }

    async fn save_file(&self, file: &StoredFile, owner_id: i64) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO files (chat_bot_id, owner_id, openai_file_id, filename, file_size) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(file.chat_bot_id)
        .bind(owner_id)
        .bind(&file.openai_file_id)
        .bind(&file.filename)
        .bind(file.file_size)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to insert file: {}", e)))?;
        let id = result.last_insert_rowid();

        let updated =
            sqlx::query("UPDATE users SET bytes_data_left = bytes_data_left - ? WHERE id = ?")
                .bind(file.file_size)
                .bind(owner_id)
                .execute(&mut *tx)
                .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "invalid owner id passed {}",
                owner_id
            )));
        }

        tx.commit().await?;
        debug!(file_id = id, chat_bot_id = file.chat_bot_id, "Saved file");
        Ok(id)
    }

    async fn remove_file(&self, id: i64, file_size: i64, owner_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM files WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
        if removed.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("file {} does not exist", id)));
        }

        sqlx::query("UPDATE users SET bytes_data_left = bytes_data_left + ? WHERE id = ?")
            .bind(file_size)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(file_id = id, "Removed file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::db::tests::test_db;
    use crate::store::{ChatBot, ChatBotRepository, Plan, User, UserRepository};

    async fn seed(db: &Database) -> (i64, i64) {
        let owner_id = db
            .save_user(&User::with_plan("owner@x.io".to_string(), Plan::Free))
            .await
            .unwrap();
        let chat_bot_id = db
            .save_chat_bot(&ChatBot {
                id: 0,
                assistant_id: "asst_1".to_string(),
                vector_store_id: "vs_1".to_string(),
                owner_id,
                name: "Helper".to_string(),
                description: String::new(),
                instructions: String::new(),
            })
            .await
            .unwrap();
        (owner_id, chat_bot_id)
    }

    fn file(chat_bot_id: i64, size: i64) -> StoredFile {
        StoredFile {
            id: 0,
            chat_bot_id,
            owner_id: 0,
            openai_file_id: "file_1".to_string(),
            filename: "notes.txt".to_string(),
            file_size: size,
        }
    }

    #[tokio::test]
    async fn test_save_charges_and_remove_refunds() {
        let (db, _temp_dir) = test_db().await;
        let (owner_id, chat_bot_id) = seed(&db).await;
        let before = db.user(owner_id).await.unwrap().bytes_data_left;

        let id = db.save_file(&file(chat_bot_id, 100), owner_id).await.unwrap();
        let stored = db.file(id, owner_id).await.unwrap();
        assert_eq!(stored.owner_id, owner_id);
        assert_eq!(stored.file_size, 100);
        assert_eq!(db.user(owner_id).await.unwrap().bytes_data_left, before - 100);

        db.remove_file(id, stored.file_size, owner_id).await.unwrap();
        assert_eq!(db.user(owner_id).await.unwrap().bytes_data_left, before);
        assert!(matches!(db.file(id, owner_id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_chat_bot_files() {
        let (db, _temp_dir) = test_db().await;
        let (owner_id, chat_bot_id) = seed(&db).await;
        db.save_file(&file(chat_bot_id, 1), owner_id).await.unwrap();
        db.save_file(&file(chat_bot_id, 2), owner_id).await.unwrap();

        assert_eq!(db.chat_bot_files(chat_bot_id, owner_id).await.unwrap().len(), 2);
        assert!(db
            .chat_bot_files(chat_bot_id, owner_id + 1)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_remove_unknown_file() {
        let (db, _temp_dir) = test_db().await;
        let (owner_id, _) = seed(&db).await;
        assert!(matches!(
            db.remove_file(77, 10, owner_id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
