//! Ingest Module Tests
//!
//! Validates the line parser's malformed-input handling and runs the whole
//! import path end to end: temp files in, framed mutations out on a
//! loopback endpoint, counters checked on the way.

#[cfg(test)]
mod tests {
    use crate::cluster::client::ClusterClient;
    use crate::cluster::config::{ClusterConfig, TimestampPolicy};
    use crate::cluster::protocol::RingEntry;
    use crate::cluster::ring::RingDirectory;
    use crate::ingest::job::ImportJob;
    use crate::ingest::parser::parse_line;
    use crate::message::wire::{RowMutation, decode_frame};

    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use tokio::io::AsyncReadExt;
    use tokio::net::{TcpListener, TcpStream};

    // ============================================================
    // PARSER TESTS
    // ============================================================

    #[test]
    fn test_parse_valid_line() {
        let triple = parse_line("k1\tc1\tv1").unwrap();
        assert_eq!(triple.row_key, "k1");
        assert_eq!(triple.column_name, b"c1");
        assert_eq!(triple.value, b"v1");
    }

    #[test]
    fn test_parse_rejects_two_fields() {
        assert!(parse_line("k1\tc1").is_none());
    }

    #[test]
    fn test_parse_rejects_single_field() {
        assert!(parse_line("just-a-key").is_none());
    }

    #[test]
    fn test_parse_rejects_empty_line() {
        assert!(parse_line("").is_none());
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        // The value is the third field only, anything past it is dropped.
        let triple = parse_line("k1\tc1\tv1\textra\tmore").unwrap();
        assert_eq!(triple.value, b"v1");
    }

    #[test]
    fn test_parse_keeps_empty_fields() {
        let triple = parse_line("k1\t\t").unwrap();
        assert_eq!(triple.column_name, b"");
        assert_eq!(triple.value, b"");
    }

    // ============================================================
    // IMPORT JOB TESTS
    // ============================================================

    struct TempInputDir {
        path: PathBuf,
    }

    impl TempInputDir {
        fn new(files: &[(&str, &str)]) -> Self {
            let path =
                std::env::temp_dir().join(format!("bulkcast-test-{}", uuid::Uuid::new_v4()));
            std::fs::create_dir_all(&path).unwrap();
            for (name, content) in files {
                std::fs::write(path.join(name), content).unwrap();
            }
            Self { path }
        }
    }

    impl Drop for TempInputDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    /// One-node cluster whose data address is a loopback listener and whose
    /// control address refuses connections, so the final flush is exercised
    /// as a logged-and-skipped failure.
    fn loopback_cluster(data_addr: SocketAddr) -> Arc<ClusterClient> {
        let refused = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let config = ClusterConfig {
            seeds: vec![refused],
            replication_factor: 1,
            timestamp_mode: TimestampPolicy::default(),
        };
        let ring = RingDirectory::from_entries(vec![RingEntry {
            token: 0,
            data_addr,
            control_addr: refused,
        }]);
        Arc::new(ClusterClient::with_ring(config, ring))
    }

    async fn read_mutation(socket: &mut TcpStream) -> RowMutation {
        let mut len_buf = [0u8; 4];
        socket.read_exact(&mut len_buf).await.unwrap();
        let len = u32::from_be_bytes(len_buf) as usize;
        let mut body = vec![0u8; len];
        socket.read_exact(&mut body).await.unwrap();

        let mut frame = len_buf.to_vec();
        frame.extend_from_slice(&body);
        decode_frame(&frame).unwrap().mutation().unwrap()
    }

    #[tokio::test]
    async fn test_import_counts_invalid_lines_and_sends_rows() {
        let input = TempInputDir::new(&[(
            "part-00000",
            "k1\tc1\tv1\nk1\tc2\tv2\nbadline\nk2\tc3\tv3\n",
        )]);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let cluster = loopback_cluster(listener.local_addr().unwrap());

        let job = ImportJob::new(cluster, "Keyspace1", "Standard1");
        job.run(&input.path)
            .await
            .expect("Skipped lines and failed flushes never fail the job");

        assert_eq!(job.counters.lines_read.load(Ordering::Relaxed), 4);
        assert_eq!(
            job.counters.invalid_lines.load(Ordering::Relaxed),
            1,
            "Exactly one malformed line"
        );
        assert_eq!(job.counters.columns_written.load(Ordering::Relaxed), 3);

        let (mut socket, _) = listener.accept().await.unwrap();

        let first = read_mutation(&mut socket).await;
        assert_eq!(first.keyspace, "Keyspace1");
        assert_eq!(first.row_key, "k1");

        let second = read_mutation(&mut socket).await;
        assert_eq!(second.row_key, "k2");
    }

    #[tokio::test]
    async fn test_import_spawns_one_writer_per_file() {
        let input = TempInputDir::new(&[
            ("part-00000", "k1\tc1\tv1\n"),
            ("part-00001", "k2\tc2\tv2\n"),
        ]);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let cluster = loopback_cluster(listener.local_addr().unwrap());

        let job = ImportJob::new(cluster, "Keyspace1", "Standard1");
        job.run(&input.path).await.unwrap();

        // Each file's writer owns its own outbound channel, so the endpoint
        // sees one connection per file.
        let mut row_keys = Vec::new();
        for _ in 0..2 {
            let (mut socket, _) = listener.accept().await.unwrap();
            row_keys.push(read_mutation(&mut socket).await.row_key);
        }
        row_keys.sort();
        assert_eq!(row_keys, vec!["k1".to_string(), "k2".to_string()]);
    }

    #[tokio::test]
    async fn test_import_of_empty_directory_is_a_noop() {
        let input = TempInputDir::new(&[]);

        let refused = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let cluster = loopback_cluster(refused);

        let job = ImportJob::new(cluster, "Keyspace1", "Standard1");
        job.run(&input.path).await.unwrap();

        assert_eq!(job.counters.lines_read.load(Ordering::Relaxed), 0);
        assert_eq!(job.counters.invalid_lines.load(Ordering::Relaxed), 0);
    }
}
