use crate::models::*;
use crate::{CallOption, ClientApi, Query, ResourceLink, Response};
use bytes::Bytes;
use documentdb_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// DocumentDb is the typed entry point over a [`ClientApi`].
///
/// Links may be self-links (`dbs/b5NCAA==/colls/b5NCAJuVNXs=/`) or named
/// links (`dbs/mydb/colls/mycoll`). Feed operations take the link of the
/// parent resource and address its child feed.
#[derive(Debug, Clone)]
pub struct DocumentDb {
    client: Arc<dyn ClientApi>,
}

impl DocumentDb {
    /// Create a new facade over `client`.
    pub fn new(client: impl ClientApi) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// The client requests go through.
    pub fn client(&self) -> &Arc<dyn ClientApi> {
        &self.client
    }

    async fn read<T: DeserializeOwned>(
        &self,
        link: &str,
        opts: &[CallOption],
    ) -> Result<Response<T>> {
        self.client.read(link, opts).await?.json()
    }

    async fn query<T: DeserializeOwned>(
        &self,
        link: &str,
        query: &Query,
        opts: &[CallOption],
    ) -> Result<Response<T>> {
        self.client.query(link, query, opts).await?.json()
    }

    async fn create<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        link: &str,
        body: &B,
        opts: &[CallOption],
    ) -> Result<Response<T>> {
        self.client.create(link, to_body(body)?, opts).await?.json()
    }

    async fn replace<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        link: &str,
        body: &B,
        opts: &[CallOption],
    ) -> Result<Response<T>> {
        self.client.replace(link, to_body(body)?, opts).await?.json()
    }

    // Databases

    /// Read a database.
    pub async fn read_database(&self, link: &str, opts: &[CallOption]) -> Result<Database> {
        Ok(self.read(link, opts).await?.into_body())
    }

    /// Read the databases of the account.
    pub async fn read_databases(&self, opts: &[CallOption]) -> Result<Response<Databases>> {
        self.read("dbs", opts).await
    }

    /// Query the databases of the account.
    pub async fn query_databases(
        &self,
        query: &Query,
        opts: &[CallOption],
    ) -> Result<Response<Databases>> {
        self.query("dbs", query, opts).await
    }

    /// Create a database with the given id.
    pub async fn create_database(&self, id: &str, opts: &[CallOption]) -> Result<Database> {
        let body = Resource::new(id);
        Ok(self.create("dbs", &body, opts).await?.into_body())
    }

    /// Replace a database.
    pub async fn replace_database(
        &self,
        link: &str,
        db: &Database,
        opts: &[CallOption],
    ) -> Result<Database> {
        Ok(self.replace(link, db, opts).await?.into_body())
    }

    /// Delete a database and everything in it.
    pub async fn delete_database(&self, link: &str, opts: &[CallOption]) -> Result<()> {
        self.delete_resource(link, opts).await
    }

    // Collections

    /// Read a collection.
    pub async fn read_collection(&self, link: &str, opts: &[CallOption]) -> Result<Collection> {
        Ok(self.read(link, opts).await?.into_body())
    }

    /// Read the collections of a database.
    pub async fn read_collections(
        &self,
        db: &str,
        opts: &[CallOption],
    ) -> Result<Response<Collections>> {
        self.read(&ResourceLink::join(db, "colls"), opts).await
    }

    /// Query the collections of a database.
    pub async fn query_collections(
        &self,
        db: &str,
        query: &Query,
        opts: &[CallOption],
    ) -> Result<Response<Collections>> {
        self.query(&ResourceLink::join(db, "colls"), query, opts)
            .await
    }

    /// Create a collection in a database.
    pub async fn create_collection(
        &self,
        db: &str,
        coll: &Collection,
        opts: &[CallOption],
    ) -> Result<Collection> {
        Ok(self
            .create(&ResourceLink::join(db, "colls"), coll, opts)
            .await?
            .into_body())
    }

    /// Delete a collection and everything in it.
    pub async fn delete_collection(&self, link: &str, opts: &[CallOption]) -> Result<()> {
        self.delete_resource(link, opts).await
    }

    // Documents

    /// Read a document.
    pub async fn read_document<T: DeserializeOwned>(
        &self,
        link: &str,
        opts: &[CallOption],
    ) -> Result<Response<T>> {
        self.read(link, opts).await
    }

    /// Read the documents of a collection.
    pub async fn read_documents<T: DeserializeOwned>(
        &self,
        coll: &str,
        opts: &[CallOption],
    ) -> Result<Response<Documents<T>>> {
        self.read(&ResourceLink::join(coll, "docs"), opts).await
    }

    /// Query the documents of a collection.
    ///
    /// Pass [`CallOption::Continuation`] to read the next page, or use
    /// [`DocumentIterator`](crate::DocumentIterator) to walk all of them.
    pub async fn query_documents<T: DeserializeOwned>(
        &self,
        coll: &str,
        query: &Query,
        opts: &[CallOption],
    ) -> Result<Response<Documents<T>>> {
        self.query(&ResourceLink::join(coll, "docs"), query, opts)
            .await
    }

    /// Create a document in a collection.
    pub async fn create_document<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        coll: &str,
        doc: &B,
        opts: &[CallOption],
    ) -> Result<Response<T>> {
        self.create(&ResourceLink::join(coll, "docs"), doc, opts)
            .await
    }

    /// Create a document, or replace it if one with the same id exists.
    pub async fn upsert_document<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        coll: &str,
        doc: &B,
        opts: &[CallOption],
    ) -> Result<Response<T>> {
        self.client
            .upsert(&ResourceLink::join(coll, "docs"), to_body(doc)?, opts)
            .await?
            .json()
    }

    /// Replace a document.
    pub async fn replace_document<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        link: &str,
        doc: &B,
        opts: &[CallOption],
    ) -> Result<Response<T>> {
        self.replace(link, doc, opts).await
    }

    /// Delete a document.
    pub async fn delete_document(&self, link: &str, opts: &[CallOption]) -> Result<()> {
        self.delete_resource(link, opts).await
    }

    // Stored procedures

    /// Read a stored procedure.
    pub async fn read_stored_procedure(
        &self,
        link: &str,
        opts: &[CallOption],
    ) -> Result<StoredProcedure> {
        Ok(self.read(link, opts).await?.into_body())
    }

    /// Read the stored procedures of a collection.
    pub async fn read_stored_procedures(
        &self,
        coll: &str,
        opts: &[CallOption],
    ) -> Result<Response<StoredProcedures>> {
        self.read(&ResourceLink::join(coll, "sprocs"), opts).await
    }

    /// Query the stored procedures of a collection.
    pub async fn query_stored_procedures(
        &self,
        coll: &str,
        query: &Query,
        opts: &[CallOption],
    ) -> Result<Response<StoredProcedures>> {
        self.query(&ResourceLink::join(coll, "sprocs"), query, opts)
            .await
    }

    /// Create a stored procedure in a collection.
    pub async fn create_stored_procedure(
        &self,
        coll: &str,
        sproc: &StoredProcedure,
        opts: &[CallOption],
    ) -> Result<StoredProcedure> {
        Ok(self
            .create(&ResourceLink::join(coll, "sprocs"), sproc, opts)
            .await?
            .into_body())
    }

    /// Replace a stored procedure.
    pub async fn replace_stored_procedure(
        &self,
        link: &str,
        sproc: &StoredProcedure,
        opts: &[CallOption],
    ) -> Result<StoredProcedure> {
        Ok(self.replace(link, sproc, opts).await?.into_body())
    }

    /// Delete a stored procedure.
    pub async fn delete_stored_procedure(&self, link: &str, opts: &[CallOption]) -> Result<()> {
        self.delete_resource(link, opts).await
    }

    /// Execute a stored procedure with the given arguments.
    ///
    /// `args` must serialize to a json array, one element per parameter of
    /// the procedure.
    pub async fn execute_stored_procedure<A: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        link: &str,
        args: &A,
        opts: &[CallOption],
    ) -> Result<Response<T>> {
        self.client
            .execute(link, to_body(args)?, opts)
            .await?
            .json()
    }

    // User defined functions

    /// Read a user defined function.
    pub async fn read_user_defined_function(
        &self,
        link: &str,
        opts: &[CallOption],
    ) -> Result<UserDefinedFunction> {
        Ok(self.read(link, opts).await?.into_body())
    }

    /// Read the user defined functions of a collection.
    pub async fn read_user_defined_functions(
        &self,
        coll: &str,
        opts: &[CallOption],
    ) -> Result<Response<UserDefinedFunctions>> {
        self.read(&ResourceLink::join(coll, "udfs"), opts).await
    }

    /// Query the user defined functions of a collection.
    pub async fn query_user_defined_functions(
        &self,
        coll: &str,
        query: &Query,
        opts: &[CallOption],
    ) -> Result<Response<UserDefinedFunctions>> {
        self.query(&ResourceLink::join(coll, "udfs"), query, opts)
            .await
    }

    /// Create a user defined function in a collection.
    pub async fn create_user_defined_function(
        &self,
        coll: &str,
        udf: &UserDefinedFunction,
        opts: &[CallOption],
    ) -> Result<UserDefinedFunction> {
        Ok(self
            .create(&ResourceLink::join(coll, "udfs"), udf, opts)
            .await?
            .into_body())
    }

    /// Replace a user defined function.
    pub async fn replace_user_defined_function(
        &self,
        link: &str,
        udf: &UserDefinedFunction,
        opts: &[CallOption],
    ) -> Result<UserDefinedFunction> {
        Ok(self.replace(link, udf, opts).await?.into_body())
    }

    /// Delete a user defined function.
    pub async fn delete_user_defined_function(
        &self,
        link: &str,
        opts: &[CallOption],
    ) -> Result<()> {
        self.delete_resource(link, opts).await
    }

    // Partition key ranges

    /// Query the partition key ranges of a collection.
    pub async fn query_partition_key_ranges(
        &self,
        coll: &str,
        query: &Query,
        opts: &[CallOption],
    ) -> Result<Response<PartitionKeyRanges>> {
        self.query(&ResourceLink::join(coll, "pkranges"), query, opts)
            .await
    }

    /// Delete any resource by link.
    pub async fn delete_resource(&self, link: &str, opts: &[CallOption]) -> Result<()> {
        self.client.delete(link, opts).await?;
        Ok(())
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Bytes> {
    serde_json::to_vec(body)
        .map(Bytes::from)
        .map_err(|e| Error::request_invalid("failed to serialize request body").with_source(e))
}
