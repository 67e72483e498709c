use futures_util::TryStreamExt;
use mongodb::{
    Collection,
    bson::{self, Document, doc},
};
use prep_schema::{ExternalQuestion, db};
use prep_utils::cache::ExternalQuestionSource;
use tracing::{debug, warn};

/// External questions stored in a MongoDB collection.
///
/// Documents are read raw and decoded one at a time, so a malformed record
/// is skipped instead of failing the whole fetch.
#[derive(Clone, Debug)]
pub struct MongoQuestionSource {
    collection: Collection<Document>,
}

impl MongoQuestionSource {
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }

    pub async fn connect(uri: &str, collection_name: &str) -> mongodb::error::Result<Self> {
        let client = db::client(uri).await?;
        let collection = db::get_collection::<Document>(&client, collection_name);
        Ok(Self::new(collection))
    }
}

/// Decodes one stored document, or `None` if it does not fit the schema.
pub fn decode_question(document: Document) -> Option<ExternalQuestion> {
    let id = document.get("_id").map(|id| id.to_string());
    match bson::from_document::<ExternalQuestion>(document) {
        Ok(question) => Some(question),
        Err(e) => {
            warn!(?id, error = %e, "skipping undecodable external question");
            None
        }
    }
}

impl ExternalQuestionSource for MongoQuestionSource {
    type Error = mongodb::error::Error;

    /// Enabled records, oldest first.
    #[tracing::instrument(skip_all, fields(collection = self.collection.name()), err(Debug))]
    async fn fetch(&self) -> Result<Vec<ExternalQuestion>, Self::Error> {
        let mut cursor = self
            .collection
            .find(doc! { "enabled": true })
            .sort(doc! { "createdAt": 1 })
            .await?;

        let mut questions = Vec::new();
        let mut skipped = 0;
        while let Some(document) = cursor.try_next().await? {
            match decode_question(document) {
                Some(question) => questions.push(question),
                None => skipped += 1,
            }
        }

        debug!(count = questions.len(), skipped, "fetched external questions");
        Ok(questions)
    }
}
