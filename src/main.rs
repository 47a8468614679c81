use car_rental_client::config::{AdminCommand, Command};
use car_rental_client::core::catalog::CatalogAnomaly;
use car_rental_client::domain::model::{
    ApiMessage, Booking, Car, Credentials, NewAdmin, NewCar, NewCustomer, RangeInput,
};
use car_rental_client::utils::error::ErrorSeverity;
use car_rental_client::utils::{logger, validation::Validate};
use car_rental_client::{BookingDesk, CliConfig, RentalApiClient, RentalError};
use clap::Parser;
use serde::Serialize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 設定檔錯誤時日誌尚未初始化，直接輸出
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let level = config.log_level.as_deref();
    if config.log_json {
        logger::init_json_logger(cli.verbose, level);
    } else {
        logger::init_cli_logger(cli.verbose, level);
    }
    tracing::debug!("Effective config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let api = match RentalApiClient::from_config(&config) {
        Ok(api) => api,
        Err(e) => exit_with(&e),
    };
    let desk = BookingDesk::from_config(api, &config);

    if let Err(e) = run(&desk, &cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        exit_with(&e);
    }

    Ok(())
}

fn exit_with(e: &RentalError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

async fn run(desk: &BookingDesk<RentalApiClient>, cli: &CliConfig) -> car_rental_client::Result<()> {
    let json = cli.json;

    match &cli.command {
        Command::Available { start, end } => {
            let input = RangeInput {
                start: start.clone(),
                end: end.clone(),
            };
            if input.resolve().is_err() {
                if json {
                    return print_cars(&[], json);
                }
                println!("Please select start and end dates to see available cars.");
                return Ok(());
            }

            let snapshot = desk.catalog().await?;
            report_anomalies(&snapshot.anomalies);
            let vehicles = desk.filter().filter_available(&snapshot.vehicles, &input);
            let cars = snapshot.cars_for(&vehicles);
            print_cars(&cars, json)?;
        }
        Command::Book {
            customer,
            car,
            start,
            end,
        } => {
            let reply = desk
                .book(*customer, *car, &RangeInput::new(start.clone(), end.clone()))
                .await?;
            print_message(&reply, "Car booked successfully!", json)?;
        }
        Command::MyBookings { customer } => {
            let bookings = desk.customer_bookings(*customer).await?;
            print_bookings(&bookings, json)?;
        }
        Command::Cancel { customer, booking } => {
            let reply = desk.cancel_as_customer(*customer, *booking).await?;
            print_message(&reply, "Booking cancelled successfully!", json)?;
        }
        Command::Register {
            name,
            email,
            password,
            mobile,
        } => {
            let customer = NewCustomer {
                name: name.clone(),
                email: email.clone(),
                password: password.clone(),
                mobile: mobile.clone(),
            };
            let reply = desk.register_customer(&customer).await?;
            print_message(&reply, "Registration successful!", json)?;
        }
        Command::Login {
            role,
            email,
            password,
        } => {
            let credentials = Credentials {
                email: email.clone(),
                password: password.clone(),
            };
            let state = desk.login(*role, &credentials).await?;
            if json {
                print_json(&state)?;
            } else {
                println!("✅ Logged in as {} ({:?})", state.user_name(), role);
            }
        }
        Command::Admin(admin) => run_admin(desk, admin, json).await?,
    }

    Ok(())
}

async fn run_admin(
    desk: &BookingDesk<RentalApiClient>,
    command: &AdminCommand,
    json: bool,
) -> car_rental_client::Result<()> {
    match command {
        AdminCommand::Bookings => {
            let bookings = desk.all_bookings().await?;
            print_bookings(&bookings, json)?;
        }
        AdminCommand::Complete { booking } => {
            let reply = desk.complete_booking(*booking).await?;
            print_message(&reply, "Booking marked as completed!", json)?;
        }
        AdminCommand::Cancel { booking } => {
            let reply = desk.cancel_booking(*booking).await?;
            print_message(&reply, "Booking cancelled successfully!", json)?;
        }
        AdminCommand::AddCar { model, brand, price } => {
            let car = NewCar {
                model: model.clone(),
                brand: brand.clone(),
                price_per_day: *price,
            };
            let reply = desk.add_car(&car).await?;
            print_message(&reply, "Car added successfully!", json)?;
        }
        AdminCommand::AddAdmin {
            name,
            email,
            password,
        } => {
            let admin = NewAdmin {
                name: name.clone(),
                email: email.clone(),
                password: password.clone(),
            };
            let reply = desk.add_admin(&admin).await?;
            print_message(&reply, "Admin added successfully!", json)?;
        }
    }
    Ok(())
}

fn report_anomalies(anomalies: &[CatalogAnomaly]) {
    for anomaly in anomalies {
        tracing::warn!(
            "⚠️ Car {}: ignored reservation ({:?}): {}",
            anomaly.vehicle_id,
            anomaly.kind,
            anomaly.detail
        );
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> car_rental_client::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_message(reply: &ApiMessage, fallback: &str, json: bool) -> car_rental_client::Result<()> {
    if json {
        return print_json(reply);
    }
    println!("✅ {}", reply.message.as_deref().unwrap_or(fallback));
    Ok(())
}

fn print_cars(cars: &[Car], json: bool) -> car_rental_client::Result<()> {
    if json {
        return print_json(cars);
    }
    if cars.is_empty() {
        println!("No cars available for selected dates.");
        return Ok(());
    }
    for car in cars {
        println!("#{:<4} {} {}  ₹{}/day", car.id, car.brand, car.model, car.price_per_day);
    }
    Ok(())
}

fn print_bookings(bookings: &[Booking], json: bool) -> car_rental_client::Result<()> {
    if json {
        return print_json(bookings);
    }
    if bookings.is_empty() {
        println!("No bookings found.");
        return Ok(());
    }
    for booking in bookings {
        let who = booking
            .customer_name
            .as_deref()
            .map(|name| format!("  ({})", name))
            .unwrap_or_default();
        let length = booking
            .period()
            .map(|period| format!(", {} days", period.days()))
            .unwrap_or_default();
        // ● 仍可完成或取消
        let marker = if booking.status.is_open() { "●" } else { "○" };
        println!(
            "{} Booking #{:<4} {} {}  {} to {}{}  [{}]{}",
            marker,
            booking.id,
            booking.brand,
            booking.model,
            booking.start_date,
            booking.end_date,
            length,
            booking.status,
            who
        );
    }
    Ok(())
}
