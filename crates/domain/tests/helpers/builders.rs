#![allow(dead_code)]
use sieve_dns_domain::wire::{MxData, SoaData, SrvData};
use sieve_dns_domain::{
    DomainName, Message, Question, RData, RecordType, ResourceRecord, ResponseCode,
};
use std::net::{Ipv4Addr, Ipv6Addr};

pub fn name(s: &str) -> DomainName {
    s.parse().unwrap()
}

pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    pub fn query(id: u16, domain: &str, qtype: RecordType) -> Self {
        Self {
            message: Message::query(id, Question::internet(domain, qtype).unwrap()),
        }
    }

    pub fn response(id: u16, domain: &str, qtype: RecordType) -> Self {
        let request = Message::query(id, Question::internet(domain, qtype).unwrap());
        Self {
            message: Message::response_to(&request, ResponseCode::NoError),
        }
    }

    pub fn rcode(mut self, rcode: ResponseCode) -> Self {
        self.message.header.flags.set_response_code(rcode);
        self
    }

    pub fn answer(mut self, record: ResourceRecord) -> Self {
        self.message.answers.push(record);
        self
    }

    pub fn authority(mut self, record: ResourceRecord) -> Self {
        self.message.authorities.push(record);
        self
    }

    pub fn additional(mut self, record: ResourceRecord) -> Self {
        self.message.additionals.push(record);
        self
    }

    pub fn build(mut self) -> Message {
        self.message.sync_counts();
        self.message
    }
}

pub fn a_record(domain: &str, ip: [u8; 4], ttl: u32) -> ResourceRecord {
    ResourceRecord::new(name(domain), RecordType::A, ttl, RData::A(Ipv4Addr::from(ip)))
}

pub fn aaaa_record(domain: &str, ip: Ipv6Addr, ttl: u32) -> ResourceRecord {
    ResourceRecord::new(name(domain), RecordType::AAAA, ttl, RData::AAAA(ip))
}

pub fn cname_record(domain: &str, target: &str, ttl: u32) -> ResourceRecord {
    ResourceRecord::new(name(domain), RecordType::CNAME, ttl, RData::CNAME(name(target)))
}

pub fn mx_record(domain: &str, preference: u16, exchange: &str) -> ResourceRecord {
    ResourceRecord::new(
        name(domain),
        RecordType::MX,
        3600,
        RData::MX(MxData {
            preference,
            exchange: name(exchange),
        }),
    )
}

pub fn srv_record(domain: &str, port: u16, target: &str) -> ResourceRecord {
    ResourceRecord::new(
        name(domain),
        RecordType::SRV,
        600,
        RData::SRV(SrvData {
            priority: 10,
            weight: 5,
            port,
            target: name(target),
        }),
    )
}

pub fn soa_record(zone: &str) -> ResourceRecord {
    ResourceRecord::new(
        name(zone),
        RecordType::SOA,
        900,
        RData::SOA(SoaData {
            mname: name(&format!("ns1.{}", zone)),
            rname: name(&format!("hostmaster.{}", zone)),
            serial: 2024_01_01,
            refresh: 7200,
            retry: 3600,
            expire: 1_209_600,
            minimum: 300,
        }),
    )
}
