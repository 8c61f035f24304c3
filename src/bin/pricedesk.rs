use std::env;
use std::process::ExitCode;

use log::{error, info};

use pricedesk::projection::{fmt_price, render_cards, render_comparison};
use pricedesk::{
    config, MarketId, Period, PriceDesk, ProductId, ReportFile, SubmitOutcome,
};

const USAGE: &str = "\
usage: pricedesk <command> [args]

commands:
  upload <report.pdf>              upload a monthly report, then show the dashboard
  dashboard [product]              stats for the default markets
  compare [period] [market...]     compare markets over a period
  products                         list products
  markets <product>                list markets quoted for a product
  detail <product> <market>        prices, stats and trend for one market

The backend address is read from PRICEDESK_API_URL (default http://localhost:8000).";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let desk = match PriceDesk::builder().from_env().build() {
        Ok(desk) => desk,
        Err(e) => {
            error!("Failed to initialise client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("{}", desk);

    let result = match command.as_str() {
        "upload" => upload(&desk, args.get(1)).await,
        "dashboard" => {
            let product = args.get(1).map(|p| ProductId::from(p.as_str()));
            dashboard(&desk, product).await
        }
        "compare" => compare(&desk, &args[1..]).await,
        "products" => products(&desk).await,
        "markets" => markets(&desk, args.get(1)).await,
        "detail" => detail(&desk, args.get(1), args.get(2)).await,
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn upload(desk: &PriceDesk, path: Option<&String>) -> pricedesk::Result<()> {
    let file = path.map(ReportFile::from_path).transpose()?;
    println!("Processing PDF... Please wait");

    match desk.uploads().submit(file.as_ref()).await {
        Ok(SubmitOutcome::NavigateToDashboard(result)) => {
            println!("Report parsed:\n{}", serde_json::to_string_pretty(result.as_value())?);
            dashboard(desk, None).await
        }
        Ok(SubmitOutcome::AlreadySubmitting) => {
            println!("An upload is already in progress.");
            Ok(())
        }
        Err(e) => {
            eprintln!("Upload failed: {e}");
            Err(e.into())
        }
    }
}

async fn dashboard(desk: &PriceDesk, product: Option<ProductId>) -> pricedesk::Result<()> {
    let mut page = match product {
        Some(p) => {
            let markets = MarketId::parse_list(&config::DEFAULT_MARKETS)?;
            desk.dashboard_for(p, markets, None)
        }
        None => desk.dashboard(),
    };

    if let Some(report) = page.report() {
        println!("Last uploaded report: {}", report.as_value());
    }

    if page.settled().await.into_result("market stats")?.is_some() {
        println!("{}", render_cards(&page.cards()));
    }
    Ok(())
}

async fn compare(desk: &PriceDesk, args: &[String]) -> pricedesk::Result<()> {
    let period = args
        .first()
        .map(|p| Period::from(p.as_str()))
        .unwrap_or_else(|| config::DEFAULT_PERIOD.into());
    let markets = if args.len() > 1 {
        MarketId::parse_list(&args[1..])?
    } else {
        MarketId::parse_list(&config::DEFAULT_COMPARE_MARKETS)?
    };

    let mut page = desk.compare(markets, period);
    if page.settled().await.into_result("comparison")?.is_some() {
        println!("Compare market prices ({})", page.period());
        println!("{}", render_comparison(&page.rows()));
    }
    Ok(())
}

async fn products(desk: &PriceDesk) -> pricedesk::Result<()> {
    for product in desk.catalog().products().await? {
        println!("{product}");
    }
    Ok(())
}

async fn markets(desk: &PriceDesk, product: Option<&String>) -> pricedesk::Result<()> {
    let product = product
        .map(|p| ProductId::from(p.as_str()))
        .unwrap_or_else(|| config::DEFAULT_PRODUCT.into());
    for market in desk.catalog().markets(&product).await? {
        println!("{market}");
    }
    Ok(())
}

async fn detail(
    desk: &PriceDesk,
    product: Option<&String>,
    market: Option<&String>,
) -> pricedesk::Result<()> {
    let (Some(product), Some(market)) = (product, market) else {
        return Err(pricedesk::PriceDeskError::InvalidArgument(
            "detail needs <product> <market>".to_string(),
        ));
    };
    let product = ProductId::from(product.as_str());
    let market = MarketId::new(market.as_str())?;

    let detail = desk.catalog().market_detail(&product, &market).await?;
    println!(
        "{} / {}: min {} max {} avg {} latest {}",
        product,
        market,
        fmt_price(detail.stat.min),
        fmt_price(detail.stat.max),
        fmt_price(detail.stat.avg),
        fmt_price(detail.stat.latest)
    );
    for rec in &detail.prices {
        println!("  {}  {:>10.2} {} {}", rec.date, rec.price, rec.currency, rec.unit);
    }
    for month in &detail.monthly {
        println!("  {}  avg {:.2}", month.month, month.avg);
    }
    if let Some(pct) = detail.mom.pct_change {
        println!("Month-over-month change: {:+.2}%", pct);
    }
    Ok(())
}
