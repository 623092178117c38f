use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::ser::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// 4 空白縮排、非 ASCII 字元原樣輸出
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// 把抓到的結果逐一寫成輸出目錄下的 JSON 檔
pub struct JsonSink<S: Storage> {
    storage: S,
}

impl<S: Storage> JsonSink<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn write<T: Serialize + ?Sized>(&self, filename: &str, value: &T) -> Result<()> {
        let data = to_pretty_json(value)?;
        tracing::debug!("💾 Writing {} ({} bytes)", filename, data.len());
        self.storage.write_file(filename, &data).await
    }
}
