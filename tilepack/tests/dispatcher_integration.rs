//! Integration tests for the request dispatcher.
//!
//! These tests drive complete requests through the service facade against
//! real SQLite tile archives, verifying:
//! - Tile and metadata lookups, including all three metadata wire formats
//! - Warm-cache behavior of the archive registry (cached open failures,
//!   close-one eviction, close-all)
//! - Coordinate validation ahead of any lookup
//! - Temp file pool rotation through the dispatcher
//! - Path containment for traversal-shaped archive identifiers

use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tilepack::service::{RequestError, ServiceConfig, TilePackService};

// =============================================================================
// Test Helpers
// =============================================================================

const TILE_BLOB: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

/// Create a tile archive with the standard schema at `dir/name`.
///
/// Parent directories are created as needed.
fn create_archive(dir: &Path, name: &str, metadata: &[(&str, Option<&str>)]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE metadata (name TEXT, value TEXT);
         CREATE TABLE tiles (
             zoom_level INTEGER,
             tile_column INTEGER,
             tile_row INTEGER,
             tile_data BLOB
         );",
    )
    .unwrap();
    for (name, value) in metadata {
        conn.execute("INSERT INTO metadata VALUES (?1, ?2)", (name, value))
            .unwrap();
    }
    conn.execute(
        "INSERT INTO tiles VALUES (3, 4, 5, ?1)",
        rusqlite::params![TILE_BLOB],
    )
    .unwrap();
}

fn read_response(service: &TilePackService, request: &str) -> Vec<u8> {
    let path = service.open_request(request).unwrap();
    fs::read(path).unwrap()
}

struct Fixture {
    service: TilePackService,
    _root: TempDir,
    _temp: TempDir,
}

/// One service over one archive with a representative metadata table.
fn fixture() -> Fixture {
    let root = TempDir::new().unwrap();
    let temp = TempDir::new().unwrap();
    create_archive(
        root.path(),
        "pack.mbtiles",
        &[
            ("name", Some("Blue Marble")),
            ("version", Some("1")),
            ("format", Some("png")),
            ("description", Some("a\tb\nc")),
            ("bounds", None),
        ],
    );
    let service = TilePackService::new(ServiceConfig::new(root.path(), temp.path())).unwrap();
    Fixture {
        service,
        _root: root,
        _temp: temp,
    }
}

// =============================================================================
// Tile Fetch
// =============================================================================

#[test]
fn tile_fetch_returns_stored_blob() {
    let f = fixture();
    assert_eq!(read_response(&f.service, "/pack.mbtiles/3/4/5.png"), TILE_BLOB);
}

#[test]
fn tile_fetch_without_extension() {
    let f = fixture();
    assert_eq!(read_response(&f.service, "/pack.mbtiles/3/4/5"), TILE_BLOB);
}

#[test]
fn missing_tile_row_is_not_found() {
    let f = fixture();
    assert_eq!(
        f.service.open_request("/pack.mbtiles/9/9/9").unwrap_err(),
        RequestError::NotFound
    );
}

#[test]
fn non_integer_coordinates_are_not_found() {
    let f = fixture();
    for request in [
        "/pack.mbtiles/3a/4/5",
        "/pack.mbtiles/3/1.5/5",
        "/pack.mbtiles/3/4/5x.png",
        "/pack.mbtiles/+3/4/5",
    ] {
        assert_eq!(
            f.service.open_request(request).unwrap_err(),
            RequestError::NotFound,
            "request {:?} should fail validation",
            request
        );
    }
}

#[test]
fn unroutable_segment_counts_are_invalid_path() {
    let f = fixture();
    assert_eq!(
        f.service.open_request("/pack.mbtiles/3/4").unwrap_err(),
        RequestError::InvalidPath
    );
    assert_eq!(
        f.service.open_request("/pack.mbtiles/3/4/5/6").unwrap_err(),
        RequestError::InvalidPath
    );
}

// =============================================================================
// Warm Cache / Registry Lifecycle
// =============================================================================

#[test]
fn unopenable_archive_is_not_found_and_failure_is_cached() {
    let root = TempDir::new().unwrap();
    let temp = TempDir::new().unwrap();
    let service = TilePackService::new(ServiceConfig::new(root.path(), temp.path())).unwrap();

    assert_eq!(
        service.open_request("/ghost.mbtiles/3/4/5").unwrap_err(),
        RequestError::NotFound
    );

    // The archive materializes on disk afterwards, but the recorded open
    // failure wins until the entry is evicted.
    create_archive(root.path(), "ghost.mbtiles", &[("version", Some("1"))]);
    assert_eq!(
        service.open_request("/ghost.mbtiles/3/4/5").unwrap_err(),
        RequestError::NotFound
    );

    // Evicting the failed entry allows a fresh, successful open.
    service.open_request("/ghost.mbtiles?c=close").unwrap();
    assert_eq!(read_response(&service, "/ghost.mbtiles/3/4/5"), TILE_BLOB);
}

#[test]
fn close_one_on_never_opened_archive_is_not_found() {
    let f = fixture();
    assert_eq!(
        f.service.open_request("/pack.mbtiles?c=close").unwrap_err(),
        RequestError::NotFound
    );
}

#[test]
fn close_one_evicts_and_next_fetch_reopens() {
    let f = fixture();

    f.service.open_request("/pack.mbtiles/3/4/5").unwrap();
    assert_eq!(f.service.archive_count(), 1);

    let response = f.service.open_request("/pack.mbtiles?c=close").unwrap();
    assert_eq!(fs::read(response).unwrap().len(), 0);
    assert_eq!(f.service.archive_count(), 0);

    assert_eq!(read_response(&f.service, "/pack.mbtiles/3/4/5"), TILE_BLOB);
    assert_eq!(f.service.archive_count(), 1);
}

#[test]
fn one_segment_without_close_is_empty_success() {
    let f = fixture();
    let response = f.service.open_request("/pack.mbtiles").unwrap();
    assert_eq!(fs::read(response).unwrap().len(), 0);
}

#[test]
fn close_all_succeeds_with_and_without_open_archives() {
    let f = fixture();

    // Nothing open yet: still an empty successful payload.
    let response = f.service.open_request("/?c=close").unwrap();
    assert_eq!(fs::read(response).unwrap().len(), 0);

    f.service.open_request("/pack.mbtiles/3/4/5").unwrap();
    assert_eq!(f.service.archive_count(), 1);

    f.service.open_request("/?c=close").unwrap();
    assert_eq!(f.service.archive_count(), 0);
}

#[test]
fn low_memory_signal_evicts_everything() {
    let f = fixture();
    f.service.open_request("/pack.mbtiles/3/4/5").unwrap();

    f.service.on_low_memory();

    assert_eq!(f.service.archive_count(), 0);
    // The service keeps working afterwards.
    assert_eq!(read_response(&f.service, "/pack.mbtiles/3/4/5"), TILE_BLOB);
}

// =============================================================================
// Metadata
// =============================================================================

#[test]
fn single_metadata_text_mode() {
    let f = fixture();
    assert_eq!(
        read_response(&f.service, "/pack.mbtiles/version"),
        b"version\t1\n"
    );
}

#[test]
fn single_metadata_text_mode_escapes_tabs_and_newlines() {
    let f = fixture();
    assert_eq!(
        read_response(&f.service, "/pack.mbtiles/description"),
        b"description\ta\\tb\\nc\n"
    );
}

#[test]
fn single_metadata_null_value_renders_null_token() {
    let f = fixture();
    assert_eq!(
        read_response(&f.service, "/pack.mbtiles/bounds"),
        b"bounds\t\\N\n"
    );
}

#[test]
fn single_metadata_json_mode() {
    let f = fixture();
    assert_eq!(
        read_response(&f.service, "/pack.mbtiles/version?json"),
        br#"{"version":"1"}"#
    );
}

#[test]
fn single_metadata_jsonp_valid_callback_wraps() {
    let f = fixture();
    assert_eq!(
        read_response(&f.service, "/pack.mbtiles/version?callback=foo"),
        br#"foo({"version":"1"});"#
    );
}

#[test]
fn single_metadata_jsonp_invalid_callback_is_bare_json() {
    let f = fixture();
    assert_eq!(
        read_response(&f.service, "/pack.mbtiles/version?callback=1foo"),
        br#"{"version":"1"}"#
    );
}

#[test]
fn metadata_key_outside_allow_list_is_not_found() {
    let f = fixture();
    assert_eq!(
        f.service.open_request("/pack.mbtiles/zoom_levels").unwrap_err(),
        RequestError::NotFound
    );
}

#[test]
fn metadata_key_with_no_row_is_not_found() {
    let f = fixture();
    assert_eq!(
        f.service.open_request("/pack.mbtiles/attribution").unwrap_err(),
        RequestError::NotFound
    );
}

#[test]
fn all_metadata_text_mode_lists_present_keys() {
    let f = fixture();
    let text = String::from_utf8(read_response(&f.service, "/pack.mbtiles/metadata")).unwrap();

    assert!(text.contains("name\tBlue Marble\n"));
    assert!(text.contains("version\t1\n"));
    assert!(text.contains("format\tpng\n"));
    assert!(text.contains("description\ta\\tb\\nc\n"));
    assert!(text.contains("bounds\t\\N\n"));
    // `type` and `attribution` have no rows and are omitted.
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn all_metadata_json_mode_is_flat_object() {
    let f = fixture();
    let body = read_response(&f.service, "/pack.mbtiles/metadata?json");
    let object: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(object["name"], "Blue Marble");
    assert_eq!(object["version"], "1");
    assert_eq!(object["bounds"], serde_json::Value::Null);
    assert!(object.get("attribution").is_none());
}

#[test]
fn all_metadata_jsonp_wraps_object() {
    let f = fixture();
    let body = String::from_utf8(
        read_response(&f.service, "/pack.mbtiles/metadata?callback=handle"),
    )
    .unwrap();

    assert!(body.starts_with("handle({"));
    assert!(body.ends_with("});"));
}

// =============================================================================
// Temp File Pool Through the Dispatcher
// =============================================================================

#[test]
fn pool_rotation_bounds_response_files() {
    let root = TempDir::new().unwrap();
    let temp = TempDir::new().unwrap();
    create_archive(root.path(), "pack.mbtiles", &[("version", Some("1"))]);
    let config = ServiceConfig::new(root.path(), temp.path()).with_max_temp_files(4);
    let service = TilePackService::new(config).unwrap();

    let first = service.open_request("/pack.mbtiles/3/4/5").unwrap();
    for _ in 0..3 {
        service.open_request("/pack.mbtiles/3/4/5").unwrap();
    }
    // Request max_files + 1 overwrites the first response's slot.
    let wrapped = service.open_request("/pack.mbtiles/version").unwrap();

    assert_eq!(first, wrapped);
    let pool_dir = wrapped.parent().unwrap();
    assert_eq!(fs::read_dir(pool_dir).unwrap().count(), 4);
    assert_eq!(fs::read(&wrapped).unwrap(), b"version\t1\n");
}

// =============================================================================
// Path Containment
// =============================================================================

#[test]
fn traversal_identifier_resolves_under_root() {
    let root = TempDir::new().unwrap();
    let temp = TempDir::new().unwrap();
    // The sanitized resolution of "../../etc/passwd" is <root>/etc/passwd,
    // so an archive placed there is what the hostile id actually reaches.
    create_archive(root.path(), "etc/passwd", &[("version", Some("1"))]);
    let service = TilePackService::new(ServiceConfig::new(root.path(), temp.path())).unwrap();

    let body = read_response(&service, "/..%2F..%2Fetc%2Fpasswd/version");

    assert_eq!(body, b"version\t1\n");
}

#[test]
fn percent_encoded_subdirectory_identifier() {
    let root = TempDir::new().unwrap();
    let temp = TempDir::new().unwrap();
    create_archive(root.path(), "japan/kanto.mbtiles", &[("name", Some("Kanto"))]);
    let service = TilePackService::new(ServiceConfig::new(root.path(), temp.path())).unwrap();

    assert_eq!(
        read_response(&service, "/japan%2Fkanto.mbtiles/name"),
        b"name\tKanto\n"
    );
}
