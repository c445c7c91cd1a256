use clap::{Args, Parser, Subcommand};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "chowline")]
#[command(about = "client cli used by operators to interact with the delivery server", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
enum Commands {
    /// restaurant related ops
    #[command(arg_required_else_help = true)]
    Restaurant(RestaurantArgs),
    /// order related ops
    #[command(arg_required_else_help = true)]
    Order(OrderArgs),
}

#[derive(Debug, Args)]
struct RestaurantArgs {
    #[command(subcommand)]
    command: RestaurantCmds,
}

#[derive(Debug, Subcommand)]
enum RestaurantCmds {
    List,
    #[command(arg_required_else_help = true)]
    Menu {
        #[arg(short = 'r', help = "Restaurant id", value_parser = clap::value_parser!(i64).range(1..))]
        id: i64,
    },
}

#[derive(Debug, Args)]
struct OrderArgs {
    #[command(subcommand)]
    command: OrderCmds,
}

#[derive(Debug, Subcommand)]
enum OrderCmds {
    #[command(arg_required_else_help = true)]
    Place {
        #[arg(short = 'u', help = "Ordering user id")]
        user: i64,
        #[arg(short = 'r', help = "Restaurant id")]
        restaurant: i64,
        #[arg(short = 'a', help = "Delivery address")]
        address: String,
        #[arg(long, help = "Line items as MENU_ITEM_ID:QUANTITY pairs.", value_name = "ID:QTY", num_args = 1..)]
        items: Vec<LineItem>,
    },
    #[command(arg_required_else_help = true)]
    Get {
        #[arg(help = "Order id")]
        id: i64,
    },
}

#[derive(Debug, Clone)]
struct LineItem {
    menu_item_id: i64,
    quantity: i32,
}

impl FromStr for LineItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, qty) = s
            .split_once(':')
            .ok_or_else(|| format!("expected MENU_ITEM_ID:QUANTITY, got {s}"))?;
        Ok(Self {
            menu_item_id: id.parse().map_err(|e| format!("bad menu item id: {e}"))?,
            quantity: qty.parse().map_err(|e| format!("bad quantity: {e}"))?,
        })
    }
}

const HOST: &str = "http://localhost:8080";

#[derive(Debug, Deserialize)]
struct PlaceOrderResponse {
    order_id: i64,
    total_amount: i64,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Cli::parse();

    match args.command {
        Commands::Restaurant(restaurant) => match restaurant.command {
            RestaurantCmds::List => {
                let res = Client::new()
                    .get(format!("{}/{}", HOST, "v1/restaurants"))
                    .send()
                    .await?;
                println!("{}", res.text().await?);
            }
            RestaurantCmds::Menu { id } => {
                let res = Client::new()
                    .get(format!("{}/v1/restaurant/{}/menu", HOST, id))
                    .send()
                    .await?;
                println!("{}", res.text().await?);
            }
        },
        Commands::Order(order) => match order.command {
            OrderCmds::Place {
                user,
                restaurant,
                address,
                items,
            } => {
                println!("placing an order at restaurant={} for user={}", restaurant, user);
                let res = Client::new()
                    .post(format!("{}/{}", HOST, "v1/orders"))
                    .json(&serde_json::json!({
                        "user_id": user,
                        "restaurant_id": restaurant,
                        "delivery_address": address,
                        "items": items.iter().map(|line| serde_json::json!({
                            "menu_item_id": line.menu_item_id,
                            "quantity": line.quantity,
                        })).collect::<Vec<_>>(),
                    }))
                    .send()
                    .await?;
                match res.status() {
                    StatusCode::OK => {
                        let res = res
                            .json::<PlaceOrderResponse>()
                            .await
                            .expect("failed to get response, aborting");
                        println!(
                            "order {} placed, total {} cents",
                            res.order_id, res.total_amount
                        );
                    }
                    StatusCode::NOT_FOUND => {
                        println!("some menu item does not exist, nothing was ordered");
                    }
                    StatusCode::BAD_REQUEST => {
                        println!("invalid order, nothing was ordered");
                    }
                    unexpected => {
                        println!("got unexpected status code, {}", unexpected);
                    }
                }
            }
            OrderCmds::Get { id } => {
                let res = Client::new()
                    .get(format!("{}/v1/order/{}", HOST, id))
                    .send()
                    .await?;
                println!("{}", res.text().await?);
            }
        },
    };
    Ok(())
}
