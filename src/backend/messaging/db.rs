//! Database operations for messaging
//!
//! Messages are inserted once and read back per conversation. The only
//! delete is the bulk removal that accompanies account deletion.

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::shared::Message;

/// Persist a freshly created message
pub async fn save_message(pool: &SqlitePool, message: &Message) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO messages (id, sender_id, receiver_id, text, image, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&message.id)
    .bind(&message.sender_id)
    .bind(&message.receiver_id)
    .bind(message.text.as_deref())
    .bind(message.image.as_deref())
    .bind(message.created_at)
    .bind(message.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Every message exchanged between `a` and `b`, oldest first
pub async fn find_conversation(pool: &SqlitePool, a: &str, b: &str) -> Result<Vec<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT id, sender_id, receiver_id, text, image, created_at, updated_at
        FROM messages
        WHERE (sender_id = ?1 AND receiver_id = ?2)
           OR (sender_id = ?2 AND receiver_id = ?1)
        ORDER BY created_at, rowid
        "#,
    )
    .bind(a)
    .bind(b)
    .fetch_all(pool)
    .await
}

/// Delete every message `user_id` sent or received
///
/// Takes any executor so account deletion can run it inside its
/// transaction.
pub async fn delete_all_for<'e, E>(executor: E, user_id: &str) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM messages WHERE sender_id = ?1 OR receiver_id = ?1")
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::server::config::connect_database;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_conversation_is_both_directions_in_order() {
        let pool = connect_database("sqlite::memory:").await.unwrap();

        let first = Message::new("a".into(), "b".into(), Some("hi".into()), None);
        let second = Message::new("b".into(), "a".into(), None, Some("https://img/1.png".into()));
        let unrelated = Message::new("a".into(), "c".into(), Some("psst".into()), None);
        for message in [&first, &second, &unrelated] {
            save_message(&pool, message).await.unwrap();
        }

        let conversation = find_conversation(&pool, "a", "b").await.unwrap();
        assert_eq!(conversation, vec![first.clone(), second.clone()]);
        assert_eq!(find_conversation(&pool, "b", "a").await.unwrap(), conversation);
    }

    #[tokio::test]
    async fn test_delete_all_for_counts_rows() {
        let pool = connect_database("sqlite::memory:").await.unwrap();
        save_message(&pool, &Message::new("a".into(), "b".into(), Some("1".into()), None)).await.unwrap();
        save_message(&pool, &Message::new("c".into(), "a".into(), Some("2".into()), None)).await.unwrap();
        save_message(&pool, &Message::new("b".into(), "c".into(), Some("3".into()), None)).await.unwrap();

        assert_eq!(delete_all_for(&pool, "a").await.unwrap(), 2);
        assert_eq!(delete_all_for(&pool, "a").await.unwrap(), 0);
        assert_eq!(find_conversation(&pool, "b", "c").await.unwrap().len(), 1);
    }
}
