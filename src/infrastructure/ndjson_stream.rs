// Newline-delimited JSON streaming utilities
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Serialize;

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Create a streaming response with one JSON document per line
pub fn ndjson_stream<S, T>(stream: S) -> Response<Body>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + Send + 'static,
{
    let byte_stream = stream.map(|item| serialize_line(&item));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(byte_stream))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Serialize a single item to a `\n`-terminated line
pub fn serialize_line<T: Serialize>(item: &T) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_vec(item)?;
    let mut line = BytesMut::with_capacity(json.len() + 1);
    line.put_slice(&json);
    line.put_u8(b'\n');
    Ok(line.freeze())
}
