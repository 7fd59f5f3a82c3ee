/*!
# phoenix-connect

<b>An idiomatic, SQL-first Rust client for Apache Phoenix Query Server.</b>

This crate provides a fully asynchronous, strongly typed API for driving a
remote Phoenix Query Server over the Avatica RPC protocol — typed protobuf
envelopes exchanged over HTTP POST, with no persistent socket per session.

It lets you open a logical connection, synchronize session properties,
prepare and execute statements (single or parameterized, individually or
batched), page through large result sets frame by frame, and coordinate
transactions — just like any other SQL toolkit — all in native Rust.

## ✨ Features

- ⚙️ **Builder-based sessions** that open and sync eagerly;
- 🪶 **Async execution** using `tokio` and `reqwest`;
- 🧩 **Parameterized queries** with positional `.bind()`;
- 📄 **Lazy pagination**: one outstanding frame at a time, bounded memory;
- 🚪 **Gateway routing** for multi-tenant clusters via alternative
  endpoint segments;
- 📦 **Batched execution** with per-item outcomes in input order.

## Getting Started

```no_run
use phoenix_connect::PhoenixSessionBuilder;

# tokio_test::block_on(async {
// 1️⃣ Connect to a Phoenix Query Server endpoint
let session = PhoenixSessionBuilder::new("http://localhost:8765")
    .build()
    .await
    .expect("failed to connect");

// 2️⃣ Execute a parameterized query and receive the result rows
let rows = session
    .query("SELECT city FROM persons WHERE last_name = ?")
    .bind("Doe")
    .fetch_all()
    .await
    .expect("query failed");

// 3️⃣ Always release the server-side connection
session.close().await.expect("close failed");
# });
```

## 🧠 Concepts

- <b>[`PhoenixSession`]</b> — the main entry point: owns the connection
  handle, enforces the legal operation sequence, and hands out statements.
- <b>[`PhoenixClient`]</b> — low-level protocol client (one method per
  RPC, used internally, available for full control).
- <b>[`Statement`] / [`PreparedStatement`]</b> — ad hoc and compiled
  statement handles, scoped to their session.
- <b>[`Cursor`]</b> — lazy, non-restartable iteration over a paged result
  set.
- <b>[`QueryBuilder`](query::QueryBuilder)</b> — fluent parameter binding
  for one-shot queries.

## ⚙️ Requirements

- A running **Phoenix Query Server** (or any Avatica-compatible server
  speaking protobuf serialization);
- Network access to the configured HTTP endpoint;
- `tokio` runtime.

## 🔒 Gateway deployments

Multi-tenant clusters front the query server with a gateway that routes by
path segment. Configure it per session:

```no_run
use phoenix_connect::{Credentials, PhoenixSessionBuilder, RequestOptions};

# tokio_test::block_on(async {
let session = PhoenixSessionBuilder::new("https://cluster.example.net")
    .credentials(Credentials::new("admin", "secret"))
    .options(RequestOptions::new().alternative_endpoint("hbasephoenix0/"))
    .build()
    .await
    .expect("failed to connect");
# session.close().await.unwrap();
# });
```

## 📘 Learn More

- [Apache Phoenix Query Server documentation](https://phoenix.apache.org/server.html)
- [Apache Calcite Avatica protobuf reference](https://calcite.apache.org/avatica/docs/protobuf_reference.html)

## Disclaimer

This project is not affiliated with, endorsed by, or sponsored by the
Apache Software Foundation. “Apache”, “Apache Phoenix”, “Apache HBase” and
“Apache Calcite” are trademarks of the Apache Software Foundation.
*/

pub mod avatica;
mod batch;
pub mod client;
mod codec;
mod cursor;
mod error;
mod literal;
mod options;
pub mod query;
mod session;
mod statement;
mod transport;

pub use batch::BatchOutcome;
pub use client::{PhoenixClient, ALL_ROWS, FETCH_ALL};
pub use cursor::Cursor;
pub use error::PhoenixError;
pub use literal::ToTypedValue;
pub use options::RequestOptions;
pub use session::{PhoenixSession, PhoenixSessionBuilder};
pub use statement::{PreparedStatement, Statement, StatementResult};
pub use transport::{Credentials, HttpTransport, Transport};

#[cfg(test)]
mod test_utils;
