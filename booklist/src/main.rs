// Booklist
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Entry point to the book catalog service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use booklist::db::{StoreOptions, init_schema};
use booklist::{RestOptions, serve};
use booklist_core::db::{Db, DbResult};
use booklist_core::env::get_optional_var;
use log::error;
use std::net::Ipv4Addr;
use std::process;

/// Prefix of all environment variables that configure the service.
const ENV_PREFIX: &str = "BOOKLIST";

/// Port to listen on when the configuration does not specify one.
const DEFAULT_PORT: u16 = 5000;

/// Makes sure the store has the schema the service needs.
async fn prepare_store(db: &(dyn Db + Send + Sync)) -> DbResult<()> {
    let mut ex = db.ex().await?;
    init_schema(&mut ex).await
}

/// Configures and runs the service until it is asked to stop.
async fn run() -> Result<(), String> {
    let port = get_optional_var::<u16>(ENV_PREFIX, "PORT")?.unwrap_or(DEFAULT_PORT);
    let store_opts = StoreOptions::from_env(ENV_PREFIX)?;
    let rest_opts = RestOptions::from_env(ENV_PREFIX)?;

    let db = store_opts.connect().await.map_err(|e| format!("Cannot open store: {}", e))?;
    if let Err(e) = prepare_store(db.as_ref()).await {
        db.close().await;
        return Err(format!("Cannot initialize store: {}", e));
    }

    serve((Ipv4Addr::UNSPECIFIED, port), db, rest_opts).await.map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        process::exit(1);
    }
}
