use crate::{
    Error, Failure, Id, Params, RpcError, RpcMessage, RpcNotification, RpcRequest, RpcResponse,
    Success, Version,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

/// RPC message originated from the editor host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostMessage {
    Request(RpcRequest),
    Notification(RpcNotification),
}

/// RPC client talking to the editor host.
#[derive(Debug)]
pub struct RpcClient {
    /// Id of the next request initiated from our side.
    id: AtomicU64,
    /// Sender for sending message to the host.
    writer_sender: UnboundedSender<RpcMessage>,
    /// Sender for registering the pending response of a request initiated from our side.
    response_sender_tx: UnboundedSender<(Id, oneshot::Sender<RpcResponse>)>,
}

impl RpcClient {
    /// Creates a new instance of [`RpcClient`].
    ///
    /// The host messages read from `reader` are forwarded to `sink`, the sink is dropped
    /// once the reader reaches EOF. Must be called within a tokio runtime.
    pub fn new(
        reader: impl BufRead + Send + 'static,
        writer: impl Write + Send + 'static,
        sink: UnboundedSender<HostMessage>,
    ) -> Self {
        let (response_sender_tx, response_sender_rx) = unbounded_channel();

        let spawn_result = std::thread::Builder::new()
            .name("stdio-reader".to_string())
            .spawn(move || {
                if let Err(error) = loop_read(reader, response_sender_rx, &sink) {
                    tracing::debug!(?error, "Thread stdio-reader exited");
                }
            });

        if let Err(error) = spawn_result {
            tracing::error!(?error, "Failed to spawn stdio-reader");
        }

        let (writer_sender, io_writer_receiver) = unbounded_channel();
        tokio::spawn(async move {
            if let Err(error) = loop_write(writer, io_writer_receiver).await {
                tracing::error!(?error, "Task stdio-writer exited");
            }
        });

        Self {
            id: Default::default(),
            writer_sender,
            response_sender_tx,
        }
    }

    fn next_request_id(&self) -> u64 {
        self.id.fetch_add(1, Ordering::SeqCst)
    }

    /// Sends a request to the host and waits for the result.
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: impl AsRef<str>,
        params: impl Serialize,
    ) -> Result<R, RpcError> {
        let id = Id::Num(self.next_request_id());
        let rpc_request = RpcRequest {
            jsonrpc: Some(Version::V2),
            id: id.clone(),
            method: method.as_ref().to_owned(),
            params: Params::from(serde_json::to_value(params)?),
        };
        let (request_result_tx, request_result_rx) = oneshot::channel();
        // The pending sender must be registered before the request is written out.
        self.response_sender_tx.send((id, request_result_tx))?;
        self.writer_sender.send(RpcMessage::Request(rpc_request))?;
        match request_result_rx.await? {
            RpcResponse::Success(ok) => Ok(serde_json::from_value(ok.result)?),
            RpcResponse::Failure(failure) => Err(RpcError::Request(failure.error)),
        }
    }

    /// Sends a notification to the host.
    pub fn notify(&self, method: impl AsRef<str>, params: impl Serialize) -> Result<(), RpcError> {
        let notification = RpcNotification {
            jsonrpc: Some(Version::V2),
            method: method.as_ref().to_owned(),
            params: Params::from(serde_json::to_value(params)?),
        };

        self.writer_sender
            .send(RpcMessage::Notification(notification))?;

        Ok(())
    }

    /// Sends the response of a request initiated from the host.
    pub fn send_response(&self, id: Id, output_result: Result<Value, Error>) -> Result<(), RpcError> {
        let rpc_response = match output_result {
            Ok(result) => RpcResponse::Success(Success {
                jsonrpc: Some(Version::V2),
                id,
                result,
            }),
            Err(error) => RpcResponse::Failure(Failure {
                jsonrpc: Some(Version::V2),
                id,
                error,
            }),
        };

        self.writer_sender
            .send(RpcMessage::Response(rpc_response))?;

        Ok(())
    }
}

/// Keeps reading and dispatching the lines from the host until EOF.
fn loop_read(
    mut reader: impl BufRead,
    mut response_sender_rx: UnboundedReceiver<(Id, oneshot::Sender<RpcResponse>)>,
    sink: &UnboundedSender<HostMessage>,
) -> Result<(), RpcError> {
    let mut pending_response_senders = HashMap::new();

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(RpcError::StreamClosed);
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<RpcMessage>(line) {
            Ok(RpcMessage::Request(rpc_request)) => {
                sink.send(HostMessage::Request(rpc_request))?;
            }
            Ok(RpcMessage::Notification(notification)) => {
                sink.send(HostMessage::Notification(notification))?;
            }
            Ok(RpcMessage::Response(response)) => {
                while let Ok((id, response_sender)) = response_sender_rx.try_recv() {
                    pending_response_senders.insert(id, response_sender);
                }

                match pending_response_senders.remove(response.id()) {
                    Some(response_sender) => {
                        response_sender
                            .send(response)
                            .map_err(RpcError::SendResponse)?;
                    }
                    None => {
                        tracing::debug!(id = %response.id(), "Dropped response without pending request");
                    }
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, ?line, "Invalid raw host message");
            }
        }
    }
}

/// Keeps writing the messages to the host.
async fn loop_write(
    mut writer: impl Write,
    mut io_writer_receiver: UnboundedReceiver<RpcMessage>,
) -> Result<(), RpcError> {
    while let Some(msg) = io_writer_receiver.recv().await {
        let s = serde_json::to_string(&msg)?;

        if s.len() < 128 {
            tracing::trace!(?msg, "=> Host");
        } else {
            let msg_size = s.len();
            match msg {
                RpcMessage::Request(request) => {
                    tracing::trace!(method = ?request.method, msg_size, "=> Host Request")
                }
                RpcMessage::Response(response) => {
                    tracing::trace!(id = %response.id(), msg_size, "=> Host Response")
                }
                RpcMessage::Notification(notification) => {
                    tracing::trace!(method = ?notification.method, msg_size, "=> Host Notification")
                }
            }
        }

        write!(writer, "Content-length: {}\n\n{}\n", s.len(), s)?;
        writer.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io::{BufReader, Read};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    /// Reader fed line by line from the test body.
    struct ChannelReader {
        rx: std::sync::mpsc::Receiver<Vec<u8>>,
        buf: Vec<u8>,
        pos: usize,
    }

    impl Read for ChannelReader {
        fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.buf.len() {
                match self.rx.recv() {
                    Ok(bytes) => {
                        self.buf = bytes;
                        self.pos = 0;
                    }
                    Err(_) => return Ok(0),
                }
            }
            let n = out.len().min(self.buf.len() - self.pos);
            out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    fn channel_reader() -> (std::sync::mpsc::Sender<Vec<u8>>, BufReader<ChannelReader>) {
        let (tx, rx) = std::sync::mpsc::channel();
        let reader = ChannelReader {
            rx,
            buf: Vec::new(),
            pos: 0,
        };
        (tx, BufReader::new(reader))
    }

    async fn wait_for_output(buf: &SharedBuf, needle: &str) -> String {
        for _ in 0..100 {
            let contents = buf.contents();
            if contents.contains(needle) {
                return contents;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        buf.contents()
    }

    #[tokio::test]
    async fn host_messages_are_forwarded_until_eof() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":7,"method":"markdown/provideContent","params":{"uri":"markdown:///a.md"}}"#,
            "\n",
            "not json\n",
            r#"{"jsonrpc":"2.0","method":"workspace/didChangeConfiguration"}"#,
            "\n"
        );
        let (sink, mut host_messages) = unbounded_channel();
        let _client = RpcClient::new(
            BufReader::new(std::io::Cursor::new(input.as_bytes().to_vec())),
            SharedBuf::default(),
            sink,
        );

        let first = host_messages.recv().await.unwrap();
        assert!(matches!(
            first,
            HostMessage::Request(ref r) if r.id == Id::Num(7) && r.method == "markdown/provideContent"
        ));

        let second = host_messages.recv().await.unwrap();
        assert!(matches!(
            second,
            HostMessage::Notification(ref n) if n.method == "workspace/didChangeConfiguration"
        ));

        // EOF drops the sink.
        assert!(host_messages.recv().await.is_none());
    }

    #[tokio::test]
    async fn notification_is_framed_with_content_length() {
        let (sink, _host_messages) = unbounded_channel();
        let output = SharedBuf::default();
        let client = RpcClient::new(
            BufReader::new(std::io::Cursor::new(Vec::new())),
            output.clone(),
            sink,
        );

        client
            .notify("markdown/didChange", serde_json::json!({"uri": "markdown:///a.md"}))
            .unwrap();

        let written = wait_for_output(&output, "didChange").await;
        let body = r#"{"jsonrpc":"2.0","method":"markdown/didChange","params":{"uri":"markdown:///a.md"}}"#;
        assert_eq!(written, format!("Content-length: {}\n\n{body}\n", body.len()));
    }

    #[tokio::test]
    async fn request_resolves_with_host_response() {
        let (sink, _host_messages) = unbounded_channel();
        let output = SharedBuf::default();
        let (input_tx, reader) = channel_reader();
        let client = Arc::new(RpcClient::new(reader, output.clone(), sink));

        let pending = {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .request::<Vec<String>>("workspace/textDocuments", Value::Null)
                    .await
            })
        };

        wait_for_output(&output, "workspace/textDocuments").await;
        input_tx
            .send(br#"{"jsonrpc":"2.0","id":0,"result":["file:///a.md"]}"#.to_vec())
            .unwrap();
        input_tx.send(b"\n".to_vec()).unwrap();

        let documents = pending.await.unwrap().unwrap();
        assert_eq!(documents, vec!["file:///a.md".to_string()]);
    }

    #[tokio::test]
    async fn failure_response_surfaces_as_request_error() {
        let (sink, _host_messages) = unbounded_channel();
        let output = SharedBuf::default();
        let (input_tx, reader) = channel_reader();
        let client = Arc::new(RpcClient::new(reader, output.clone(), sink));

        let pending = {
            let client = client.clone();
            tokio::spawn(async move { client.request::<Value>("window/activeTextEditor", Value::Null).await })
        };

        wait_for_output(&output, "window/activeTextEditor").await;
        input_tx
            .send(b"{\"id\":0,\"error\":{\"code\":-32603,\"message\":\"boom\"}}\n".to_vec())
            .unwrap();

        match pending.await.unwrap() {
            Err(RpcError::Request(error)) => assert_eq!(error.message, "boom"),
            other => panic!("expected request error, got {other:?}"),
        }
    }
}
