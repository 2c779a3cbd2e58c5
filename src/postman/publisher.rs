use crate::Result;
use crate::collection::Collection;
use crate::logger::SharedLogger;
use crate::postman::client::PostmanClient;

/// 发布结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishAction {
    Created { uid: String },
    Updated { uid: String },
}

impl PublishAction {
    pub fn uid(&self) -> &str {
        match self {
            PublishAction::Created { uid } | PublishAction::Updated { uid } => uid,
        }
    }
}

/// 按名称查找远端 collection，存在则整体覆盖，否则新建
pub struct Publisher {
    client: PostmanClient,
    logger: SharedLogger,
}

impl Publisher {
    pub fn new(client: PostmanClient, logger: SharedLogger) -> Self {
        Self { client, logger }
    }

    pub async fn publish(&self, collection: &Collection) -> Result<PublishAction> {
        let name = &collection.info.name;
        let existing = self
            .client
            .list_collections()
            .await?
            .into_iter()
            .find(|remote| &remote.name == name);

        match existing {
            Some(remote) => {
                self.logger.info(&format!(
                    "Collection found. Updating existing collection: {} - {}",
                    name, remote.uid
                ));
                self.client.update_collection(&remote.uid, collection).await?;
                Ok(PublishAction::Updated { uid: remote.uid })
            }
            None => {
                self.logger
                    .info("Collection not found. Creating new collection...");
                let created = self.client.create_collection(collection).await?;
                Ok(PublishAction::Created { uid: created.uid })
            }
        }
    }
}
