use std::borrow::Cow;
use std::marker::PhantomData;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Deserializer};

use crate::validate::JsonObject;

/// Parameters identifying a repository, shared by every tool.
/// Provide `directory` to auto-detect from `.git/config`, or `repository` as `owner/repo`.
/// When both are given, `directory` wins.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RepoParams {
    /// Absolute path to a local checkout; owner/repo is read from its `origin` remote.
    pub directory: Option<String>,
    /// Repository in `owner/repo` form. Ignored when `directory` is provided.
    pub repository: Option<String>,
}

/// Limit/offset pagination parameters.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100). Defaults to 15.
    pub limit: Option<i64>,
    /// Number of items to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Tool arguments kept as a raw JSON object so they can be validated field by field,
/// while advertising the input schema of the documented parameter struct `S`.
#[derive(Debug)]
pub struct RawArgs<S> {
    args: JsonObject,
    _schema: PhantomData<fn() -> S>,
}

impl<S> RawArgs<S> {
    pub fn new(args: JsonObject) -> Self {
        Self {
            args,
            _schema: PhantomData,
        }
    }

    pub fn into_inner(self) -> JsonObject {
        self.args
    }
}

impl<'de, S> Deserialize<'de> for RawArgs<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonObject::deserialize(deserializer).map(Self::new)
    }
}

impl<S: JsonSchema> JsonSchema for RawArgs<S> {
    fn schema_name() -> Cow<'static, str> {
        S::schema_name()
    }

    fn schema_id() -> Cow<'static, str> {
        S::schema_id()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        S::json_schema(generator)
    }
}
