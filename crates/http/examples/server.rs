use async_trait::async_trait;
use http::StatusCode;
use nano_http::connection::ResponseWriter;
use nano_http::handler::Handler;
use nano_http::protocol::{HeaderMap, Method, Request, SendError};
use nano_http::server::Server;
use tokio::io::AsyncWrite;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

const PORT: u16 = 42069;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let server = match Server::builder().address(("127.0.0.1", PORT)).handler(DemoHandler).start().await {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "failed to start server");
            return;
        }
    };
    info!(addr = %server.local_addr(), "server started");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(cause = %e, "failed to listen for ctrl-c");
    }
    server.close().await;
    info!("server gracefully stopped");
}

struct DemoHandler;

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Handler<W> for DemoHandler {
    async fn call(&self, writer: &mut ResponseWriter<W>, request: Request) {
        let result = if let Some(count) = request.target().strip_prefix("/stream/") {
            stream(writer, count).await
        } else {
            match (request.method(), request.target()) {
                (_, "/yourproblem") => text(writer, StatusCode::BAD_REQUEST, "Your problem is not my problem\n").await,
                (_, "/myproblem") => text(writer, StatusCode::INTERNAL_SERVER_ERROR, "Woopsie, my bad\n").await,
                (Method::Post, "/echo") => echo_chunked(writer, &request).await,
                _ => text(writer, StatusCode::OK, "All good, frfr\n").await,
            }
        };

        if let Err(e) = result {
            error!(cause = %e, target = request.target(), "failed to write response");
        }
    }
}

async fn text<W>(writer: &mut ResponseWriter<W>, status: StatusCode, body: &str) -> Result<(), SendError>
where
    W: AsyncWrite + Unpin + Send,
{
    writer.write_status(status).await?;
    writer.write_headers(&HeaderMap::default_response(body.len())).await?;
    writer.write_body(body.as_bytes()).await
}

/// Sends the request body back in 16 byte chunks.
async fn echo_chunked<W>(writer: &mut ResponseWriter<W>, request: &Request) -> Result<(), SendError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut headers = HeaderMap::new();
    headers.insert("Connection", "close");
    headers.insert("Transfer-Encoding", "chunked");
    headers.insert("Content-Type", request.headers().get("content-type").unwrap_or("application/octet-stream"));

    writer.write_status(StatusCode::OK).await?;
    writer.write_headers(&headers).await?;
    for chunk in request.body().chunks(16) {
        writer.write_chunked_body(chunk).await?;
    }
    writer.write_chunked_body_done().await
}

/// Streams `count` numbered lines, then reports what was sent in trailers.
async fn stream<W>(writer: &mut ResponseWriter<W>, count: &str) -> Result<(), SendError>
where
    W: AsyncWrite + Unpin + Send,
{
    let Ok(count) = count.parse::<usize>() else {
        return text(writer, StatusCode::BAD_REQUEST, "expected /stream/{count}\n").await;
    };

    let mut headers = HeaderMap::new();
    headers.insert("Connection", "close");
    headers.insert("Transfer-Encoding", "chunked");
    headers.insert("Content-Type", "text/plain");
    headers.insert("Trailer", "X-Content-Length, X-Line-Count");

    writer.write_status(StatusCode::OK).await?;
    writer.write_headers(&headers).await?;

    let mut total = 0;
    for line in 0..count {
        total += writer.write_chunked_body(format!("line {line}\n").as_bytes()).await?;
    }

    let mut trailers = HeaderMap::new();
    trailers.insert("X-Content-Length", total.to_string());
    trailers.insert("X-Line-Count", count.to_string());
    writer.write_trailers(&trailers).await
}
