use std::sync::Arc;

use async_trait::async_trait;
use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};

use crate::domain::{DataAccessError, Entity, Id};

/// 部屋のリポジトリトレイト
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 全ての部屋を取得する。並び順が空室検索の優先順になる
    async fn find_all(&self) -> Result<Vec<Room>, DataAccessError>;
    /// IDから部屋を取得する
    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, DataAccessError>;
}

#[async_trait]
impl<T: RoomRepository + ?Sized> RoomRepository for Arc<T> {
    async fn find_all(&self) -> Result<Vec<Room>, DataAccessError> {
        (**self).find_all().await
    }

    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, DataAccessError> {
        (**self).find_by_id(id).await
    }
}

/// 部屋のID
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct RoomId(i32);

impl RoomId {
    /// 空室がないことを表す値
    pub const UNAVAILABLE: RoomId = RoomId(-1);
}

impl Id for RoomId {
    type Inner = i32;
}

/// 部屋エンティティ
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    description: String,
}

impl Room {
    pub fn new(id: RoomId, description: String) -> Self {
        Self { id, description }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Entity for Room {
    type Id = RoomId;

    const ENTITY_NAME: &'static str = "room";

    fn id(&self) -> Self::Id {
        self.id
    }
}
