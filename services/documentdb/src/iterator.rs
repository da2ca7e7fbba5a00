use crate::{CallOption, DocumentDb, Query};
use documentdb_core::Result;
use log::debug;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// DocumentIterator pages through the results of a document query.
///
/// Each call to [`DocumentIterator::next_page`] runs the query again with the
/// continuation token of the previous page.
///
/// ```no_run
/// use documentdb::{DocumentDb, DocumentIterator, Query};
///
/// # async fn example(db: DocumentDb) -> documentdb_core::Result<()> {
/// let query = Query::new("SELECT * FROM root");
/// let mut iter = DocumentIterator::<serde_json::Value>::new("dbs/mydb/colls/mycoll", query, vec![]);
/// while let Some(docs) = iter.next_page(&db).await? {
///     println!("got {} documents", docs.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DocumentIterator<T> {
    coll: String,
    query: Query,
    opts: Vec<CallOption>,
    continuation: Option<String>,
    done: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> DocumentIterator<T> {
    /// Create an iterator over the documents of `coll` matching `query`.
    pub fn new(coll: impl Into<String>, query: Query, opts: Vec<CallOption>) -> Self {
        Self {
            coll: coll.into(),
            query,
            opts,
            continuation: None,
            done: false,
            _marker: PhantomData,
        }
    }

    /// Fetch the next page.
    ///
    /// Returns `None` once a page came back without a continuation token.
    /// A failed fetch can be retried: the iterator only moves forward on
    /// success.
    pub async fn next_page(&mut self, db: &DocumentDb) -> Result<Option<Vec<T>>> {
        if self.done {
            return Ok(None);
        }

        let mut opts = self.opts.clone();
        if let Some(token) = &self.continuation {
            opts.push(CallOption::Continuation(token.clone()));
        }

        let resp = db
            .query_documents::<T>(&self.coll, &self.query, &opts)
            .await?;
        self.continuation = resp.continuation().map(str::to_string);
        self.done = self.continuation.is_none();
        debug!(
            "fetched document page of {}, has more: {}",
            self.coll, !self.done
        );

        Ok(Some(resp.into_body().documents))
    }

    /// The continuation token of the next page, if there is one.
    pub fn continuation(&self) -> Option<&str> {
        self.continuation.as_deref()
    }

    /// Whether the last page has been fetched.
    pub fn is_done(&self) -> bool {
        self.done
    }
}
