// Chunked frame streaming utilities
use crate::application::telemetry_engine::FrameSubscription;
use crate::infrastructure::frame_mapper::{FrameDto, frame_to_dto};
use crate::infrastructure::http_response::brotli_compress;
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::Stream;

pub const FRAME_STREAM_CONTENT_TYPE: &str = "application/vnd.membrane-frames+json";

/// Create a chunked streaming response of length-prefixed frames
pub async fn chunked_frame_stream<S>(
    stream: S,
    compress: bool,
) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = FrameDto> + Send + 'static,
{
    let byte_stream = stream.then(move |frame| async move { serialize_chunk(&frame, compress).await });

    let body = Body::from_stream(byte_stream);

    // Chunks are compressed individually, so the response carries no
    // Content-Encoding; clients decode each chunk after reading its length.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, FRAME_STREAM_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single frame to a chunk
pub async fn serialize_chunk(frame: &FrameDto, compress: bool) -> Result<Bytes, std::io::Error> {
    let buffer = serde_json::to_vec(frame)?;

    let payload = if compress {
        brotli_compress(buffer).await?
    } else {
        buffer
    };

    // 4-byte big-endian length prefix
    let length = payload.len() as u32;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Streams the current frame (if any) and every later one until the engine stops
pub async fn stream_from_subscription(
    mut subscription: FrameSubscription,
    compress: bool,
) -> impl IntoResponse {
    let stream = async_stream::stream! {
        let current = subscription.latest();
        if !current.is_empty() {
            yield frame_to_dto(&current);
        }
        while let Some(frame) = subscription.next().await {
            yield frame_to_dto(&frame);
        }
    };

    match chunked_frame_stream(stream, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::{OverrideInputs, TelemetryFrame, UnitSnapshot};

    fn dto() -> FrameDto {
        let unit = UnitSnapshot::sample(|range| range.hi, &OverrideInputs::default());
        frame_to_dto(&TelemetryFrame::new(9, vec![unit]))
    }

    #[tokio::test]
    async fn test_chunk_is_length_prefixed_json() {
        let chunk = serialize_chunk(&dto(), false).await.unwrap();

        let length = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize;
        assert_eq!(length, chunk.len() - 4);

        let value: serde_json::Value = serde_json::from_slice(&chunk[4..]).unwrap();
        assert_eq!(value["sequence"], 9);
        assert_eq!(value["rows"][0]["NTFlowLive"], "100.0");
    }

    #[tokio::test]
    async fn test_compressed_chunk_prefix_matches_payload() {
        let plain = serialize_chunk(&dto(), false).await.unwrap();
        let compressed = serialize_chunk(&dto(), true).await.unwrap();

        let length =
            u32::from_be_bytes([compressed[0], compressed[1], compressed[2], compressed[3]]);
        assert_eq!(length as usize, compressed.len() - 4);
        assert_ne!(&plain[4..], &compressed[4..]);
    }
}
