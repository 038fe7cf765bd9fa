// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowdesk CLI entrypoint.
//!
//! Resolves configuration (flags over environment over defaults), starts the file logger,
//! restores the stored auth session and runs the terminal UI. API requests run on a
//! current-thread tokio runtime while the UI loop blocks on its own thread.

use std::error::Error;
use std::io;

use flowdesk::api::{ApiClient, SessionContext};
use flowdesk::config::{self, AppConfig, ConfigError};
use flowdesk::logging::init_logging;
use flowdesk::store::SessionFile;
use flowdesk::tui::{self, Launch};
use log::{info, warn};

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "flowdesk".to_owned());

        let options = match config::parse_options(args) {
            Ok(options) => options,
            Err(ConfigError::Usage(reason)) => {
                eprintln!("{program}: {reason}\n");
                eprintln!("{}", config::usage(&program));
                std::process::exit(2);
            }
            Err(err) => return Err(err.into()),
        };
        if options.help {
            println!("{}", config::usage(&program));
            return Ok(());
        }

        let config = AppConfig::from_env(options)?;
        init_logging(config.log_level, &config.log_dir)?;
        info!(
            "event=startup module=main api={} session_file={}",
            config.api_base_url,
            config.session_file.display()
        );

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        runtime.block_on(async move {
            let session = SessionContext::persistent(
                SessionFile::new(&config.session_file).with_durability(config.durability),
            );
            let authenticated = match session.hydrate().await {
                Ok(found) => found,
                Err(err) => {
                    warn!("event=session_restore module=main status=error error={err}");
                    false
                }
            };
            let client = ApiClient::new(config.api_base_url.clone(), session)?;
            let launch = Launch {
                authenticated,
                open_canvas: config.open_canvas.clone(),
            };

            let tui_result = tokio::task::spawn_blocking(move || {
                tui::run(client, launch).map_err(|err| err.to_string())
            })
            .await
            .map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| Box::new(io::Error::other(err)) as Box<dyn Error>)?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        info!("event=shutdown module=main");
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("flowdesk: {err}");
        std::process::exit(1);
    }
}
