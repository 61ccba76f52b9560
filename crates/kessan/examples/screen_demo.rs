//! Demonstration of an end-to-end screen over in-memory feeds.
//!
//! Run with: cargo run --example screen_demo -p kessan

use kessan::data::{AggregateStore, FeedKind, FeedLoader};
use kessan::{ScreenCriteria, Screener};
use std::io::Cursor;

const PROFIT_LOSS: &str = "\
code,period,revenue,operating,ordinary,net,eps,roe,roa
1301,2022/03,100,90,80,60,10.0,12.0,7.0
1301,2023/03,120,110,100,80,12.0,11.0,6.0
1332,2022/03,200,50,40,30,3.0,8.0,4.0
1332,2023/03,-,60,50,35,3.5,8.5,4.2
";

const BALANCE_SHEET: &str = "\
code,period,assets,net_assets,equity,retained,short_debt,long_debt,bps,equity_ratio
1301,2022/03,4000,1000,1000,100,300,600,500,25.0
1301,2023/03,4000,1400,1400,200,200,500,600,35.0
1332,2022/03,9000,1000,1000,50,900,4000,300,11.0
1332,2023/03,9000,1000,1000,60,900,4000,300,11.0
";

const CASH_FLOW: &str = "\
code,period,operating,investing,financing,capex,fcf,cash
1301,2022/03,100,-50,-20,-40,60,1000
1301,2023/03,10,-50,-20,-40,-30,800
1332,2022/03,20,-50,-20,-40,60,100
1332,2023/03,25,-50,-20,-40,-30,120
";

const DIVIDEND: &str = "\
code,period,dps,total,buyback,payout
1301,2022/03,10,100,0,30.0
1301,2023/03,12,120,0,40.0
1332,2022/03,5,50,0,35.0
1332,2023/03,5,50,0,35.0
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Kessan Screen Demo ===\n");

    let loader = FeedLoader::default();
    let mut store = AggregateStore::new();
    for (feed, csv) in [
        (FeedKind::ProfitLoss, PROFIT_LOSS),
        (FeedKind::BalanceSheet, BALANCE_SHEET),
        (FeedKind::CashFlow, CASH_FLOW),
        (FeedKind::Dividend, DIVIDEND),
    ] {
        let report = loader.load_reader(feed, Cursor::new(csv), &mut store)?;
        println!(
            "{feed:<20} {} rows, {} merged, {} skipped",
            report.rows,
            report.merged(),
            report.skipped.len()
        );
    }

    let snapshot = store.freeze();
    let screener = Screener::default();

    let result = screener.screen(&snapshot, ScreenCriteria::SafeAndGrowing);
    println!("{}", result.to_export().to_ascii_table());

    for code in snapshot.codes() {
        if let Some(diagnosis) = screener.inspect(&snapshot, &code) {
            println!("{}", diagnosis.report().to_ascii_table());
        }
    }

    Ok(())
}
