mod common;

use common::{operator, setup};
use netls_core::filter::{IdcFilter, Pagination, VendorFilter, VlanFilter};
use netls_core::patch::Audit;
use netls_core::{
    IdcPatch, IdcService, IpAddrService, NewIdc, NewIpAddr, NewVendor, NewVlan, ServiceError,
    VendorPatch, VendorService, VlanPatch, VlanService,
};
use pretty_assertions::assert_eq;

fn vendor(fullname: &str) -> NewVendor {
    NewVendor {
        comp_fullname: fullname.to_owned(),
        ..Default::default()
    }
}

fn facility(name: &str, vendor_id: i32) -> NewIdc {
    NewIdc {
        name: name.to_owned(),
        vendor_id,
        ..Default::default()
    }
}

#[tokio::test]
async fn vendor_lifecycle() {
    let db = &setup().await;

    let acme = VendorService::add(db, &operator(), vendor("  Acme Networks Ltd. "))
        .await
        .unwrap();
    assert_eq!(acme.comp_fullname, "Acme Networks Ltd.");
    assert_eq!(acme.comp_name, "Acme Networks Ltd.");
    assert_eq!(acme.comp_hash, format!("{:x}", md5::compute("Acme Networks Ltd.")));

    let dup = VendorService::add(db, &operator(), vendor("Acme Networks Ltd.")).await;
    assert!(matches!(dup, Err(ServiceError::ObjectExists(_))));

    let blank = VendorService::add(db, &operator(), vendor("   ")).await;
    assert!(matches!(blank, Err(ServiceError::InvalidParam(_))));

    let patched = VendorService::update(
        db,
        &operator(),
        acme.id,
        VendorPatch {
            contact: Some("Jo".into()),
            comp_name: Some("ACME".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(patched.contact, "Jo");
    assert_eq!(patched.comp_name, "ACME");
    assert_eq!(patched.comp_hash, acme.comp_hash);

    let found = VendorService::list(
        db,
        &VendorFilter {
            name: Some("ACME".into()),
        },
        Pagination::all(),
    )
    .await
    .unwrap();
    assert_eq!(found.count, 1);

    assert_eq!(VendorService::delete(db, &operator(), acme.id).await.unwrap(), 1);
    assert!(matches!(
        VendorService::get(db, acme.id).await,
        Err(ServiceError::ObjectNotFound(_))
    ));
}

#[tokio::test]
async fn cjk_vendor_gets_an_ascii_short_name() {
    let db = &setup().await;

    let telecom = VendorService::add(db, &operator(), vendor("北京电信通信有限公司"))
        .await
        .unwrap();
    assert_eq!(telecom.comp_fullname, "北京电信通信有限公司");
    assert!(telecom.comp_name.is_ascii());
    assert!(telecom.comp_name.starts_with("Bei Jing"), "{}", telecom.comp_name);
    assert!(telecom.comp_name.chars().count() <= 32);
}

#[tokio::test]
async fn vendor_rename_reaches_its_facilities() {
    let db = &setup().await;

    let old = VendorService::add(db, &operator(), vendor("Old Name Inc")).await.unwrap();
    VendorService::add(db, &operator(), vendor("Taken Inc")).await.unwrap();
    let dc = IdcService::add(db, &operator(), facility("AMS-1", old.id))
        .await
        .unwrap();
    assert_eq!(dc.vendor_name, "Old Name Inc");

    let clash = VendorService::update(
        db,
        &operator(),
        old.id,
        VendorPatch {
            comp_fullname: Some("Taken Inc".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(clash, Err(ServiceError::ObjectExists(_))));

    let renamed = VendorService::update(
        db,
        &operator(),
        old.id,
        VendorPatch {
            comp_fullname: Some("New Name Inc".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_ne!(renamed.comp_hash, old.comp_hash);

    let dc = IdcService::get(db, dc.id).await.unwrap();
    assert_eq!(dc.vendor_name, "New Name Inc");
    assert_eq!(dc.vendor_id, Some(old.id));
}

#[tokio::test]
async fn deleting_vendors_detaches_facilities() {
    let db = &setup().await;

    let a = VendorService::add(db, &operator(), vendor("Vendor A")).await.unwrap();
    let b = VendorService::add(db, &operator(), vendor("Vendor B")).await.unwrap();
    let dc_a = IdcService::add(db, &operator(), facility("DC-A", a.id)).await.unwrap();
    let dc_b = IdcService::add(db, &operator(), facility("DC-B", b.id)).await.unwrap();

    assert_eq!(
        VendorService::delete_batch(db, &operator(), vec![a.id, b.id, 404]).await.unwrap(),
        2
    );

    for id in [dc_a.id, dc_b.id] {
        let dc = IdcService::get(db, id).await.unwrap();
        assert_eq!(dc.vendor_id, None);
        assert_eq!(dc.vendor_name, "");
    }
}

#[tokio::test]
async fn facility_rules() {
    let db = &setup().await;

    let missing_vendor = IdcService::add(db, &operator(), facility("LON-1", 9)).await;
    assert!(matches!(missing_vendor, Err(ServiceError::ObjectNotFound(_))));

    let lon = IdcService::add(
        db,
        &operator(),
        NewIdc {
            country: "UK".into(),
            city: "London".into(),
            ..facility("LON-1", 0)
        },
    )
    .await
    .unwrap();
    assert_eq!(lon.vendor_id, None);

    let dup = IdcService::add(db, &operator(), facility("LON-1", 0)).await;
    assert!(matches!(dup, Err(ServiceError::ObjectExists(_))));
    let unnamed = IdcService::add(db, &operator(), facility("", 0)).await;
    assert!(matches!(unnamed, Err(ServiceError::InvalidParam(_))));

    let carrier = VendorService::add(db, &operator(), vendor("Carrier")).await.unwrap();
    let ip = IpAddrService::add(
        db,
        &operator(),
        NewIpAddr {
            ipaddr: "10.0.0.1".into(),
            idc_id: lon.id,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let moved = IdcService::update(
        db,
        &operator(),
        lon.id,
        IdcPatch {
            name: Some("LON-2".into()),
            vendor_id: Some(carrier.id),
            city: Some("".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.name, "LON-2");
    assert_eq!(moved.vendor_name, "Carrier");
    assert_eq!(moved.city, "London");
    let renamed = IpAddrService::get(db, ip.id).await.unwrap();
    assert_eq!(renamed.idc_name, "LON-2");
    assert_eq!(renamed.updated_by, "tester");

    let by_vendor = IdcService::list(
        db,
        &IdcFilter {
            vendor_id: Some(carrier.id),
            country: Some("UK".into()),
            ..Default::default()
        },
        Pagination::all(),
    )
    .await
    .unwrap();
    assert_eq!(by_vendor.count, 1);

    assert!(matches!(
        IdcService::delete(db, &operator(), 4040).await,
        Err(ServiceError::ObjectNotFound(_))
    ));
}

#[tokio::test]
async fn deleting_facilities_detaches_ip_resources() {
    let db = &setup().await;

    let fra = IdcService::add(db, &operator(), facility("FRA-1", 0)).await.unwrap();
    let ams = IdcService::add(db, &operator(), facility("AMS-1", 0)).await.unwrap();
    let kept = IdcService::add(db, &operator(), facility("PAR-1", 0)).await.unwrap();

    let mut ips = Vec::new();
    for (ipaddr, idc_id) in [("10.0.0.1", fra.id), ("10.0.1.0/30", ams.id), ("10.0.2.1", kept.id)] {
        let ip = IpAddrService::add(
            db,
            &operator(),
            NewIpAddr {
                ipaddr: ipaddr.into(),
                idc_id,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        ips.push(ip.id);
    }

    let remover = Audit::now("remover");
    assert_eq!(IdcService::delete(db, &remover, fra.id).await.unwrap(), 1);
    assert_eq!(
        IdcService::delete_batch(db, &remover, vec![ams.id, 404]).await.unwrap(),
        1
    );

    for id in &ips[..2] {
        let ip = IpAddrService::get(db, *id).await.unwrap();
        assert_eq!(ip.idc_id, 0);
        assert_eq!(ip.idc_name, "");
        assert_eq!(ip.updated_by, "remover");
    }
    let untouched = IpAddrService::get(db, ips[2]).await.unwrap();
    assert_eq!(untouched.idc_id, kept.id);
    assert_eq!(untouched.idc_name, "PAR-1");
}

#[tokio::test]
async fn vlan_rules() {
    let db = &setup().await;

    let v100 = VlanService::add(
        db,
        &operator(),
        NewVlan {
            vlan_id: "100".into(),
            network: "10.100.0.0/16".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(v100.name, "Vlan-100");

    let l3 = VlanService::add(
        db,
        &operator(),
        NewVlan {
            vlan_id: "l3".into(),
            name: "core routing".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(l3.vlan_id, "L3");
    assert_eq!(l3.name, "core routing");

    for bad in [
        NewVlan {
            vlan_id: "0".into(),
            ..Default::default()
        },
        NewVlan {
            vlan_id: "200".into(),
            network: "10.0.0.1".into(),
            ..Default::default()
        },
    ] {
        assert!(matches!(
            VlanService::add(db, &operator(), bad).await,
            Err(ServiceError::InvalidParam(_))
        ));
    }
    let dup = VlanService::add(
        db,
        &operator(),
        NewVlan {
            vlan_id: "100".into(),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(dup, Err(ServiceError::ObjectExists(_))));

    let clash = VlanService::update(
        db,
        &operator(),
        l3.id,
        VlanPatch {
            vlan_id: Some("100".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(clash, Err(ServiceError::ObjectExists(_))));

    let by_network = VlanService::list(
        db,
        &VlanFilter {
            network: Some("10.100.".into()),
            ..Default::default()
        },
        Pagination::all(),
    )
    .await
    .unwrap();
    assert_eq!(by_network.count, 1);
    assert_eq!(by_network.list[0].id, v100.id);

    assert_eq!(VlanService::delete_batch(db, vec![v100.id, l3.id]).await.unwrap(), 2);
}
