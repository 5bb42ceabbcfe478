//! HTTP implementation of the card/board API.
//!
//! Authenticates every request with the key/token query parameters the
//! board service expects and binds itself to one board at construction
//! time.

use crate::config::TrelloConfig;
use crate::task::ports::{
    BoardList, CardBoardApi, CardChecklist, CardChecklistItem, CardLabel, CardRecord,
    RemoteApiError, RemoteApiResult,
};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Base URL of the card board REST API.
const BASE_URL: &str = "https://api.trello.com/1";

/// Request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// State of a checklist item on the wire.
const ITEM_STATE_COMPLETE: &str = "complete";
const ITEM_STATE_INCOMPLETE: &str = "incomplete";

/// HTTP client for the card/board API, bound to a single board.
pub struct HttpCardBoardApi {
    client: reqwest::Client,
    api_key: String,
    api_token: String,
    board_id: String,
}

#[derive(Debug, Deserialize)]
struct BoardResource {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ListResource {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct LabelResource {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CardResource {
    id: String,
    name: String,
    #[serde(default, rename = "desc")]
    description: String,
    #[serde(default, rename = "idLabels")]
    label_ids: Vec<String>,
    #[serde(default, rename = "dueComplete")]
    due_complete: bool,
}

#[derive(Debug, Deserialize)]
struct ChecklistResource {
    id: String,
    name: String,
    #[serde(default, rename = "checkItems")]
    check_items: Vec<CheckItemResource>,
}

#[derive(Debug, Deserialize)]
struct CheckItemResource {
    id: String,
    name: String,
    state: String,
}

impl From<ListResource> for BoardList {
    fn from(list: ListResource) -> Self {
        Self {
            id: list.id,
            name: list.name,
        }
    }
}

impl From<LabelResource> for CardLabel {
    fn from(label: LabelResource) -> Self {
        Self {
            id: label.id,
            name: label.name,
            color: label.color.unwrap_or_default(),
        }
    }
}

impl From<CardResource> for CardRecord {
    fn from(card: CardResource) -> Self {
        Self {
            id: card.id,
            name: card.name,
            description: card.description,
            label_ids: card.label_ids,
            due_complete: card.due_complete,
        }
    }
}

impl From<CheckItemResource> for CardChecklistItem {
    fn from(item: CheckItemResource) -> Self {
        Self {
            id: item.id,
            name: item.name,
            checked: item.state == ITEM_STATE_COMPLETE,
        }
    }
}

impl From<ChecklistResource> for CardChecklist {
    fn from(checklist: ChecklistResource) -> Self {
        Self {
            id: checklist.id,
            name: checklist.name,
            items: checklist
                .check_items
                .into_iter()
                .map(CardChecklistItem::from)
                .collect(),
        }
    }
}

impl HttpCardBoardApi {
    /// Connects to the board named in the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteApiError`] when the client cannot be built, the
    /// board listing fails, or no board carries the configured name.
    pub async fn connect(config: &TrelloConfig) -> RemoteApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(RemoteApiError::transport)?;
        let mut api = Self {
            client,
            api_key: config.api_key().to_owned(),
            api_token: config.api_token().to_owned(),
            board_id: String::new(),
        };
        let boards: Vec<BoardResource> = api
            .request_json(Method::GET, "/members/me/boards", &[("fields", "name")])
            .await?;
        let board = boards
            .into_iter()
            .find(|board| board.name == config.board_name())
            .ok_or_else(|| {
                RemoteApiError::backend(format!("Board '{}' not found", config.board_name()))
            })?;
        info!(board_id = %board.id, "card board selected");
        api.board_id = board.id;
        Ok(api)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> RemoteApiResult<reqwest::Response> {
        debug!(%method, path, "card board request");
        let response = self
            .client
            .request(method, format!("{BASE_URL}{path}"))
            .query(&[("key", self.api_key.as_str()), ("token", self.api_token.as_str())])
            .query(query)
            .send()
            .await
            .map_err(RemoteApiError::transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> RemoteApiResult<T> {
        let response = self.send(method, path, query).await?;
        response
            .json()
            .await
            .map_err(|err| RemoteApiError::Decode(err.to_string()))
    }

    async fn request_unit(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> RemoteApiResult<()> {
        self.send(method, path, query).await.map(|_| ())
    }
}

#[async_trait]
impl CardBoardApi for HttpCardBoardApi {
    async fn lists(&self) -> RemoteApiResult<Vec<BoardList>> {
        let lists: Vec<ListResource> = self
            .request_json(Method::GET, &format!("/boards/{}/lists", self.board_id), &[])
            .await?;
        Ok(lists.into_iter().map(BoardList::from).collect())
    }

    async fn create_list(&self, name: &str) -> RemoteApiResult<BoardList> {
        let list: ListResource = self
            .request_json(
                Method::POST,
                "/lists",
                &[("name", name), ("idBoard", &self.board_id)],
            )
            .await?;
        Ok(list.into())
    }

    async fn cards(&self, list_id: &str) -> RemoteApiResult<Vec<CardRecord>> {
        let cards: Vec<CardResource> = self
            .request_json(Method::GET, &format!("/lists/{list_id}/cards"), &[])
            .await?;
        Ok(cards.into_iter().map(CardRecord::from).collect())
    }

    async fn create_card(
        &self,
        list_id: &str,
        name: &str,
        description: &str,
    ) -> RemoteApiResult<CardRecord> {
        let card: CardResource = self
            .request_json(
                Method::POST,
                "/cards",
                &[
                    ("idList", list_id),
                    ("name", name),
                    ("desc", description),
                    ("pos", "bottom"),
                ],
            )
            .await?;
        Ok(card.into())
    }

    async fn labels(&self) -> RemoteApiResult<Vec<CardLabel>> {
        let labels: Vec<LabelResource> = self
            .request_json(Method::GET, &format!("/boards/{}/labels", self.board_id), &[])
            .await?;
        Ok(labels.into_iter().map(CardLabel::from).collect())
    }

    async fn create_label(&self, name: &str, color: &str) -> RemoteApiResult<CardLabel> {
        let label: LabelResource = self
            .request_json(
                Method::POST,
                "/labels",
                &[("idBoard", self.board_id.as_str()), ("name", name), ("color", color)],
            )
            .await?;
        Ok(label.into())
    }

    async fn add_label(&self, card_id: &str, label_id: &str) -> RemoteApiResult<()> {
        self.request_unit(
            Method::POST,
            &format!("/cards/{card_id}/idLabels"),
            &[("value", label_id)],
        )
        .await
    }

    async fn remove_label(&self, card_id: &str, label_id: &str) -> RemoteApiResult<()> {
        self.request_unit(
            Method::DELETE,
            &format!("/cards/{card_id}/idLabels/{label_id}"),
            &[],
        )
        .await
    }

    async fn set_due_complete(&self, card_id: &str, complete: bool) -> RemoteApiResult<()> {
        let value = if complete { "true" } else { "false" };
        self.request_unit(
            Method::PUT,
            &format!("/cards/{card_id}"),
            &[("dueComplete", value)],
        )
        .await
    }

    async fn set_description(&self, card_id: &str, description: &str) -> RemoteApiResult<()> {
        self.request_unit(
            Method::PUT,
            &format!("/cards/{card_id}"),
            &[("desc", description)],
        )
        .await
    }

    async fn checklists(&self, card_id: &str) -> RemoteApiResult<Vec<CardChecklist>> {
        let checklists: Vec<ChecklistResource> = self
            .request_json(
                Method::GET,
                &format!("/cards/{card_id}/checklists"),
                &[("checkItems", "all")],
            )
            .await?;
        Ok(checklists.into_iter().map(CardChecklist::from).collect())
    }

    async fn create_checklist(
        &self,
        card_id: &str,
        name: &str,
        items: &[String],
    ) -> RemoteApiResult<CardChecklist> {
        let created: ChecklistResource = self
            .request_json(
                Method::POST,
                "/checklists",
                &[("idCard", card_id), ("name", name)],
            )
            .await?;
        let mut checklist = CardChecklist::from(created);
        for item in items {
            let added = self.add_checklist_item(&checklist.id, item).await?;
            checklist.items.push(added);
        }
        Ok(checklist)
    }

    async fn add_checklist_item(
        &self,
        checklist_id: &str,
        name: &str,
    ) -> RemoteApiResult<CardChecklistItem> {
        let item: CheckItemResource = self
            .request_json(
                Method::POST,
                &format!("/checklists/{checklist_id}/checkItems"),
                &[("name", name)],
            )
            .await?;
        Ok(item.into())
    }

    async fn set_checklist_item(
        &self,
        card_id: &str,
        item_id: &str,
        checked: bool,
    ) -> RemoteApiResult<()> {
        let state = if checked {
            ITEM_STATE_COMPLETE
        } else {
            ITEM_STATE_INCOMPLETE
        };
        self.request_unit(
            Method::PUT,
            &format!("/cards/{card_id}/checkItem/{item_id}"),
            &[("state", state)],
        )
        .await
    }

    async fn delete_card(&self, card_id: &str) -> RemoteApiResult<()> {
        self.request_unit(Method::DELETE, &format!("/cards/{card_id}"), &[])
            .await
    }
}
