use crate::{Error, error::Result, parse_id};
use futures::TryStreamExt as _;
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use time::OffsetDateTime;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct CreateMember {
    pub book_id: Option<i64>,
    /// Required by the store, missing value fails on insert
    pub borrower: Option<String>,
    pub issue_date: Option<OffsetDateTime>,
    pub return_date: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub book_id: Option<i64>,
    pub borrower: String,
    #[serde(with = "time::serde::rfc3339")]
    pub issue_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub return_date: Option<OffsetDateTime>,
}

pub type MemberRepository = MemberRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct MemberRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> MemberRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// `issue_date` defaults to now
    pub async fn create(&self, payload: CreateMember) -> Result<Member> {
        let issue_date = payload
            .issue_date
            .unwrap_or_else(OffsetDateTime::now_utc);
        let result = sqlx::query(
            "INSERT INTO member (book_id, borrower, issue_date, return_date) VALUES (?, ?, ?, ?)",
        )
        .bind(payload.book_id)
        .bind(&payload.borrower)
        .bind(issue_date)
        .bind(payload.return_date)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Created member record {id} for book {:?}", payload.book_id);
        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<Member> {
        const SQL: &str =
            "SELECT id, book_id, borrower, issue_date, return_date FROM member WHERE id = ?";
        sqlx::query_as::<_, Member>(SQL)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?
            .ok_or_else(|| Error::RecordNotFound("Member".to_string()))
    }

    /// Lookup by id as received from outside, unparsable id is just not found
    pub async fn find(&self, id: &str) -> Result<Option<Member>> {
        match parse_id(id) {
            Some(id) => match self.get(id).await {
                Ok(member) => Ok(Some(member)),
                Err(Error::RecordNotFound(_)) => Ok(None),
                Err(e) => Err(e),
            },
            None => Ok(None),
        }
    }

    /// First (oldest) record for given book and borrower
    pub async fn find_by_book_and_borrower(
        &self,
        book_id: i64,
        borrower: &str,
    ) -> Result<Option<Member>> {
        const SQL: &str = r#"
        SELECT id, book_id, borrower, issue_date, return_date FROM member
        WHERE book_id = ? AND borrower = ?
        ORDER BY id LIMIT 1
        "#;
        let member = sqlx::query_as::<_, Member>(SQL)
            .bind(book_id)
            .bind(borrower)
            .fetch_optional(&self.executor)
            .await?;
        Ok(member)
    }

    pub async fn list_by_book(&self, book_id: i64) -> Result<Vec<Member>> {
        const SQL: &str = "SELECT id, book_id, borrower, issue_date, return_date FROM member WHERE book_id = ? ORDER BY id";
        let records = sqlx::query_as::<_, Member>(SQL)
            .bind(book_id)
            .fetch(&self.executor)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records)
    }

    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM member")
            .fetch_one(&self.executor)
            .await?;
        Ok(count as u64)
    }

    pub async fn set_return_date(&self, id: i64, return_date: OffsetDateTime) -> Result<Member> {
        let result = sqlx::query("UPDATE member SET return_date = ? WHERE id = ?")
            .bind(return_date)
            .bind(id)
            .execute(&self.executor)
            .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound("Member".to_string()))
        } else {
            self.get(id).await
        }
    }

    /// Renames borrower, `None` keeps current value
    pub async fn update_borrower(&self, id: &str, borrower: Option<&str>) -> Result<Member> {
        let id = parse_id(id).ok_or_else(|| Error::RecordNotFound("Member".to_string()))?;
        let result = sqlx::query("UPDATE member SET borrower = COALESCE(?, borrower) WHERE id = ?")
            .bind(borrower)
            .bind(id)
            .execute(&self.executor)
            .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound("Member".to_string()))
        } else {
            self.get(id).await
        }
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = parse_id(id).ok_or_else(|| Error::RecordNotFound("Member".to_string()))?;
        let res = sqlx::query("DELETE FROM member WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound("Member".to_string()))
        } else {
            Ok(())
        }
    }
}
