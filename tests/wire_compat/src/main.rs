fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use chunkup_protocol::{
        CheckData, CheckQuery, ChunkFields, Envelope, MergeRequest, ProcessRequest,
    };

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    fn read_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    fn load_fixture(name: &str) -> serde_json::Value {
        serde_json::from_str(&read_fixture(name))
            .unwrap_or_else(|e| panic!("failed to parse fixture {name}: {e}"))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it and
    /// compares the JSON values (key-order independent).
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let text = read_fixture(name);
        let parsed: T = serde_json::from_str(&text)
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        let fixture = load_fixture(name);
        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  wire: {fixture}\n  ours: {reserialized}"
        );
        parsed
    }

    // --- Request bodies ---

    #[test]
    fn fixture_check_query() {
        let q: CheckQuery = roundtrip_test("check_query.json");
        let keys: Vec<String> = q.to_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["file_md5", "chunk_size", "filename"]);
    }

    #[test]
    fn fixture_chunk_fields() {
        let f: ChunkFields = roundtrip_test("chunk_fields.json");
        assert_eq!(f.chunk_id, 2);
    }

    #[test]
    fn fixture_merge_request() {
        roundtrip_test::<MergeRequest>("merge_request.json");
    }

    #[test]
    fn fixture_process_request() {
        let p: ProcessRequest = roundtrip_test("process_request.json");
        assert_eq!(p.path, "/store/2026/big.bin");
    }

    // --- Responses ---

    #[test]
    fn fixture_check_response_complete() {
        let env: Envelope = roundtrip_test("check_response_complete.json");
        assert!(env.is_success());
        let data: CheckData = env.parse_data().unwrap().unwrap();
        assert!(data.status);
        assert_eq!(data.path.as_deref(), Some("/store/2026/big.bin"));
    }

    #[test]
    fn fixture_check_response_missing() {
        let env: Envelope = roundtrip_test("check_response_missing.json");
        let data: CheckData = env.parse_data().unwrap().unwrap();
        assert!(!data.status);
        assert_eq!(data.path, None);
        assert_eq!(data.chunk_ids, vec![0, 2]);
    }

    #[test]
    fn fixture_merge_response() {
        let env: Envelope = roundtrip_test("merge_response.json");
        let path: String = env.parse_data().unwrap().unwrap();
        assert_eq!(path, "/store/2026/big.bin");
    }

    #[test]
    fn fixture_failure_response() {
        let env: Envelope = roundtrip_test("failure_response.json");
        assert!(!env.is_success());
        assert_eq!(env.message.as_deref(), Some("chunk 1 digest mismatch"));
    }

    #[test]
    fn fixture_failure_sentinel() {
        roundtrip_test::<Envelope>("failure_sentinel.json");
        let ours = serde_json::to_value(Envelope::sentinel()).unwrap();
        assert_eq!(ours, load_fixture("failure_sentinel.json"));
    }

    #[test]
    fn check_data_tolerates_missing_chunk_ids() {
        let data: CheckData =
            serde_json::from_str(r#"{"status": true, "path": "/a"}"#).unwrap();
        assert!(data.chunk_ids.is_empty());
    }
}
