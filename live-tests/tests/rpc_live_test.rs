//! Dataport lifecycle against a live account: lookup-or-create, write, read.

mod common;

use onep::rpc::{CallStatus, ReadOptions, ResourceRef, RpcError};
use serde_json::json;
use serial_test::serial;

async fn lookup_or_create(ctx: &live_tests::LiveContext, alias: &str) -> String {
    match ctx.onep.rpc.lookup(ctx.cik.as_str(), "alias", alias).await {
        Ok(rid) => rid,
        Err(RpcError::Call {
            status: CallStatus::Invalid,
            ..
        }) => {
            let rid = ctx
                .onep
                .rpc
                .create(
                    ctx.cik.as_str(),
                    "dataport",
                    json!({
                        "format": "integer",
                        "meta": "",
                        "name": "who is me",
                        "preprocess": [],
                        "public": false,
                        "retention": {"count": "infinity", "duration": "infinity"},
                        "subscribe": null
                    }),
                )
                .await
                .expect("create failed");
            ctx.onep
                .rpc
                .map_alias(ctx.cik.as_str(), &rid, alias)
                .await
                .expect("map failed");
            rid
        }
        Err(e) => panic!("lookup of '{}' failed: {}", alias, e),
    }
}

#[tokio::test]
#[serial]
async fn dataport_write_read_drop() {
    skip_if_no_account!();
    let ctx = common::setup();

    let rid1 = lookup_or_create(&ctx, "X1").await;
    let rid2 = lookup_or_create(&ctx, "X2").await;
    let port1 = ResourceRef::Rid(rid1);
    let port2 = ResourceRef::Rid(rid2);

    let value = chrono::Utc::now().timestamp() % 100;
    ctx.onep
        .rpc
        .write(ctx.cik.as_str(), &port1, value)
        .await
        .expect("write failed");

    let points = ctx
        .onep
        .rpc
        .read(ctx.cik.as_str(), &port1, &ReadOptions::latest())
        .await
        .expect("read failed");
    assert_eq!(points.len(), 1);

    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    ctx.onep
        .rpc
        .writegroup(
            ctx.cik.as_str(),
            &[(port1.clone(), json!(value)), (port2.clone(), json!(value))],
        )
        .await
        .expect("writegroup failed");

    for port in [&port1, &port2] {
        let points = ctx
            .onep
            .rpc
            .read(ctx.cik.as_str(), port, &ReadOptions::default())
            .await
            .expect("read after writegroup failed");
        assert!(!points.is_empty());
    }

    ctx.onep.rpc.drop(ctx.cik.as_str(), &port1).await.expect("drop X1 failed");
    ctx.onep.rpc.drop(ctx.cik.as_str(), &port2).await.expect("drop X2 failed");

    ctx.onep
        .rpc
        .listing(ctx.cik.as_str(), &["dataport"])
        .await
        .expect("listing failed");

    let device_rid = ctx
        .onep
        .rpc
        .lookup(ctx.cik.as_str(), "alias", "")
        .await
        .expect("lookup of own rid failed");
    ctx.onep
        .rpc
        .info(
            ctx.cik.as_str(),
            &ResourceRef::Rid(device_rid),
            json!({"aliases": true}),
        )
        .await
        .expect("info failed");
}
