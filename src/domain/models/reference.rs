use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkValue {
    pub tag: String,
    pub text: String,
    pub html: String,
}

/// A source excerpt from a filing that an assistant answer cites.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub file_id: String,
    pub index: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub chunk_value: ChunkValue,
}

impl Reference {
    pub fn key(&self) -> String {
        return format!("{}-{}", self.file_id, self.index);
    }
}
