use galactic_netconf::types::{
    Address, DelegateConf, GalacticConf, Ipam, NetConfList, PluginConf, Route, Termination,
};

fn galactic_conf() -> GalacticConf {
    GalacticConf {
        plugin_type: "galactic".to_string(),
        vpc: "1hVwxnaA7".to_string(),
        vpc_attachment: "h31".to_string(),
        mtu: 1300,
        terminations: vec![Termination {
            network: "10.1.1.0/24".to_string(),
            via: None,
        }],
        ipam: None,
    }
}

fn ipam() -> Ipam {
    Ipam::new_static(
        vec![Address {
            address: "10.1.1.1/24".to_string(),
        }],
        vec![Route {
            dst: "192.168.2.0/24".to_string(),
            gw: "10.1.1.2".to_string(),
        }],
    )
}

#[test]
fn test_net_conf_list_creation() -> Result<(), Box<dyn std::error::Error>> {
    let mut conf = NetConfList::new("0.4.0");
    assert!(conf.plugins.is_empty());
    assert!(conf.galactic().is_none());
    assert!(conf.ipam().is_none());

    conf.add_plugin(PluginConf::Galactic(galactic_conf()));
    assert_eq!(conf.plugins.len(), 1);
    assert_eq!(conf.galactic().map(|g| g.vpc.as_str()), Some("1hVwxnaA7"));

    Ok(())
}

#[test]
fn test_termination_without_via_omits_field() -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_value(Termination {
        network: "10.1.1.0/24".to_string(),
        via: None,
    })?;
    assert_eq!(json, serde_json::json!({"network": "10.1.1.0/24"}));
    Ok(())
}

#[test]
fn test_empty_terminations_are_omitted() -> Result<(), Box<dyn std::error::Error>> {
    let mut conf = galactic_conf();
    conf.terminations.clear();
    let json = serde_json::to_value(&conf)?;
    assert!(json.get("terminations").is_none());
    assert!(json.get("ipam").is_none());
    assert_eq!(json["vpcattachment"], "h31");
    assert_eq!(json["type"], "galactic");
    Ok(())
}

#[test]
fn test_chained_list_deserializes_both_blocks() -> Result<(), Box<dyn std::error::Error>> {
    let mut conf = NetConfList::new("0.4.0");
    conf.add_plugin(PluginConf::Galactic(galactic_conf()));
    conf.add_plugin(PluginConf::Delegate(DelegateConf {
        plugin_type: "host-device".to_string(),
        device: "G1hVwxnaA7h31G".to_string(),
        ipam: ipam(),
    }));

    let serialized = conf.to_json()?;
    let deserialized: NetConfList = serde_json::from_str(&serialized)?;

    assert_eq!(deserialized, conf);
    assert!(matches!(deserialized.plugins[1], PluginConf::Delegate(_)));
    assert_eq!(deserialized.ipam().map(|i| i.ipam_type.as_str()), Some("static"));
    Ok(())
}
