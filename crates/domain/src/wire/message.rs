use super::codes::ResponseCode;
use super::header::{Flags, Header, HEADER_LEN};
use super::question::Question;
use super::reader::WireReader;
use super::record::ResourceRecord;
use super::writer::WireWriter;
use crate::DomainError;

/// Smallest possible question: root name, type, class.
const MIN_QUESTION_LEN: usize = 5;
/// Smallest possible record: root name, type, class, ttl, rdlength.
const MIN_RECORD_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    /// Recursive query for `question`.
    pub fn query(id: u16, question: Question) -> Self {
        let mut flags = Flags::default();
        flags.set_recursion_desired(true);

        let mut message = Self {
            header: Header::new(id, flags),
            questions: vec![question],
            ..Self::default()
        };
        message.sync_counts();
        message
    }

    /// Empty response to `request` carrying its id, opcode, RD bit and questions.
    pub fn response_to(request: &Message, rcode: ResponseCode) -> Self {
        let mut flags = Flags::default();
        flags.set_response(true);
        flags.set_opcode(request.header.flags.opcode());
        flags.set_recursion_desired(request.header.flags.recursion_desired());
        flags.set_recursion_available(true);
        flags.set_response_code(rcode);

        let mut message = Self {
            header: Header::new(request.header.id, flags),
            questions: request.questions.clone(),
            ..Self::default()
        };
        message.sync_counts();
        message
    }

    pub fn id(&self) -> u16 {
        self.header.id
    }

    pub fn response_code(&self) -> ResponseCode {
        self.header.flags.response_code()
    }

    /// The only question, if there is exactly one.
    pub fn single_question(&self) -> Option<&Question> {
        match self.questions.as_slice() {
            [question] => Some(question),
            _ => None,
        }
    }

    pub fn min_answer_ttl(&self) -> Option<u32> {
        self.answers.iter().map(|record| record.ttl).min()
    }

    /// Sets the header counts from the section lengths (saturating at u16::MAX).
    pub fn sync_counts(&mut self) {
        let count = |len: usize| u16::try_from(len).unwrap_or(u16::MAX);
        self.header.question_count = count(self.questions.len());
        self.header.answer_count = count(self.answers.len());
        self.header.authority_count = count(self.authorities.len());
        self.header.additional_count = count(self.additionals.len());
    }

    pub fn encode(&self) -> Result<Vec<u8>, DomainError> {
        let mut writer = WireWriter::new();
        self.encode_into(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Appends the message to `writer`, sharing its name offset cache across
    /// every section. Header counts are taken from the section lengths.
    pub fn encode_into(&self, writer: &mut WireWriter) -> Result<usize, DomainError> {
        let start = writer.position();

        let mut header = self.header;
        header.question_count = section_count("question", self.questions.len())?;
        header.answer_count = section_count("answer", self.answers.len())?;
        header.authority_count = section_count("authority", self.authorities.len())?;
        header.additional_count = section_count("additional", self.additionals.len())?;
        header.encode(writer);

        for question in &self.questions {
            question.encode(writer);
        }
        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            record.encode(writer)?;
        }

        Ok(writer.position() - start)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DomainError> {
        let mut reader = WireReader::new(bytes);
        Self::decode_from(&mut reader)
    }

    pub fn decode_from(reader: &mut WireReader<'_>) -> Result<Self, DomainError> {
        if reader.remaining() < HEADER_LEN {
            return Err(DomainError::MalformedMessage(format!(
                "message of {} bytes is shorter than a header",
                reader.remaining()
            )));
        }
        let header = Header::decode(reader)?;

        let declared_min = header.question_count as usize * MIN_QUESTION_LEN
            + (header.answer_count as usize
                + header.authority_count as usize
                + header.additional_count as usize)
                * MIN_RECORD_LEN;
        if declared_min > reader.remaining() {
            return Err(DomainError::MalformedMessage(format!(
                "header declares at least {} bytes of sections, {} remain",
                declared_min,
                reader.remaining()
            )));
        }

        let mut questions = Vec::with_capacity(header.question_count as usize);
        for _ in 0..header.question_count {
            questions.push(Question::decode(reader)?);
        }

        let answers = decode_records(reader, header.answer_count)?;
        let authorities = decode_records(reader, header.authority_count)?;
        let additionals = decode_records(reader, header.additional_count)?;

        Ok(Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }
}

fn section_count(section: &str, len: usize) -> Result<u16, DomainError> {
    u16::try_from(len).map_err(|_| {
        DomainError::MalformedMessage(format!("{} {} records do not fit a header count", len, section))
    })
}

fn decode_records(
    reader: &mut WireReader<'_>,
    count: u16,
) -> Result<Vec<ResourceRecord>, DomainError> {
    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        records.push(ResourceRecord::decode(reader)?);
    }
    Ok(records)
}
