//! Command execution over the client-core services.

use crate::cli::{Command, InstanceCommand, ListArgs, VolumeCommand};
use crate::error::ConsoleError;

use client_core::ApiClient;
use client_core::request::UploadFile;
use client_core::services::{ComputeService, StorageService, UserService};

use log::info;
use models::{
    ComputeInstance, ListParams, LoginParams, PaginationParams, PaginationResponse, StorageVolume,
};
use serde_json::Value;

pub async fn run(command: Command, client: ApiClient) -> Result<(), ConsoleError> {
    let users = UserService::new(client.clone());

    match command {
        Command::Login { username, password } => {
            let response = users
                .login(&LoginParams::new(username.clone(), password))
                .await
                .map_err(ConsoleError::request)?;
            println!("Signed in as {username}");
            if let Some(permissions) = &response.data.permissions {
                println!("Permissions: {}", permissions.join(", "));
            }
        }
        Command::Logout => {
            // Local credentials are gone even if the server call failed.
            if let Err(e) = users.logout().await {
                info!("Server logout failed: {e}");
            }
            println!("Signed out");
        }
        Command::Whoami => {
            require_login(&users)?;
            let user = users
                .get_user_info()
                .await
                .map_err(ConsoleError::request)?
                .data;
            println!(
                "{} ({}) role={} email={}",
                user.username,
                user.id,
                user.role,
                user.email.as_deref().unwrap_or("-")
            );
        }
        Command::Instances(command) => {
            require_login(&users)?;
            run_instances(command, ComputeService::new(client)).await?;
        }
        Command::Volumes(command) => {
            require_login(&users)?;
            run_volumes(command, StorageService::new(client)).await?;
        }
        Command::Upload { path, url, fields } => {
            let file = UploadFile::from_path(&path).map_err(|e| {
                ConsoleError::console(format!("Failed to read {}: {e}", path.display()))
            })?;
            let response = client
                .upload::<Value, _, _>(&url, file, fields)
                .await
                .map_err(ConsoleError::request)?;
            println!("{}", response.data);
        }
        Command::Download { url, output } => {
            let saved = client
                .download(&url, output.as_deref())
                .await
                .map_err(ConsoleError::request)?;
            println!("Saved to {}", saved.display());
        }
    }

    Ok(())
}

async fn run_instances(command: InstanceCommand, compute: ComputeService) -> Result<(), ConsoleError> {
    let (action, result) = match command {
        InstanceCommand::List(args) => {
            let page = compute
                .list_instances(&list_params(args)?)
                .await
                .map_err(ConsoleError::request)?
                .data;
            print_page(&page, format_instance);
            return Ok(());
        }
        InstanceCommand::Start { id } => ("Started", compute.start_instance(&id).await),
        InstanceCommand::Stop { id } => ("Stopped", compute.stop_instance(&id).await),
        InstanceCommand::Reboot { id } => ("Rebooting", compute.reboot_instance(&id).await),
        InstanceCommand::Delete { id } => ("Deleted", compute.delete_instance(&id).await),
    };

    result.map_err(ConsoleError::request)?;
    println!("{action}");
    Ok(())
}

async fn run_volumes(command: VolumeCommand, storage: StorageService) -> Result<(), ConsoleError> {
    let (action, result) = match command {
        VolumeCommand::List(args) => {
            let page = storage
                .list_volumes(&list_params(args)?)
                .await
                .map_err(ConsoleError::request)?
                .data;
            print_page(&page, format_volume);
            return Ok(());
        }
        VolumeCommand::Attach { id, instance } => {
            ("Attached", storage.attach_volume(&id, &instance).await)
        }
        VolumeCommand::Detach { id } => ("Detached", storage.detach_volume(&id).await),
        VolumeCommand::Delete { id } => ("Deleted", storage.delete_volume(&id).await),
    };

    result.map_err(ConsoleError::request)?;
    println!("{action}");
    Ok(())
}

fn require_login(users: &UserService) -> Result<(), ConsoleError> {
    if users.is_logged_in() {
        Ok(())
    } else {
        Err(ConsoleError::not_logged_in())
    }
}

pub fn list_params(args: ListArgs) -> Result<ListParams, ConsoleError> {
    let mut pagination =
        PaginationParams::new(args.page, args.page_size).map_err(ConsoleError::config)?;
    if let Some(keyword) = args.keyword {
        pagination = pagination.with_keyword(keyword);
    }

    Ok(ListParams {
        pagination,
        status: args.status,
        region: args.region,
        ..ListParams::default()
    })
}

fn print_page<T>(page: &PaginationResponse<T>, format_row: fn(&T) -> String) {
    for row in &page.list {
        println!("{}", format_row(row));
    }
    let (first, last) = page.row_range();
    println!(
        "-- rows {first}-{last} of {}, page {}/{}",
        page.total,
        page.current,
        page.page_count()
    );
}

pub fn format_instance(instance: &ComputeInstance) -> String {
    format!(
        "{:<12} {:<20} {:<8} {}C/{}G/{}G {:<15} {}",
        instance.id,
        instance.name,
        format!("{:?}", instance.status).to_lowercase(),
        instance.cpu,
        instance.memory,
        instance.disk,
        instance.ip,
        instance.region
    )
}

pub fn format_volume(volume: &StorageVolume) -> String {
    format!(
        "{:<12} {:<20} {:>5}G {:?} {:?} {}",
        volume.id,
        volume.name,
        volume.size,
        volume.volume_type,
        volume.status,
        volume.attached_to.as_deref().unwrap_or("-")
    )
}
