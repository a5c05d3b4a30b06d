//! Built-in sample data used when a dataset file cannot be read

/// (course name, outcome)
pub const MOCK_COURSE_OUTCOMES: &[(&str, &str)] = &[
    (
        "Introduction to Programming",
        "Write, test and debug small programs in Python using variables, loops and functions.",
    ),
    (
        "Introduction to Programming",
        "Apply basic problem solving and decompose problems into reusable procedures.",
    ),
    (
        "Introduction to Programming",
        "Use Git to track changes to source code and collaborate on simple projects.",
    ),
    (
        "Data Structures and Algorithms",
        "Implement lists, stacks, queues, trees and graphs in Java and C++.",
    ),
    (
        "Data Structures and Algorithms",
        "Analyze the time and space complexity of sorting and searching algorithms.",
    ),
    (
        "Database Systems",
        "Design normalized relational schemas and query them with SQL.",
    ),
    (
        "Database Systems",
        "Administer PostgreSQL databases and compare them with document stores such as MongoDB.",
    ),
    (
        "Web Development",
        "Build responsive pages with HTML, CSS and JavaScript.",
    ),
    (
        "Web Development",
        "Develop single-page applications with React backed by Node.js services.",
    ),
    (
        "Machine Learning",
        "Train and evaluate supervised machine learning models in Python.",
    ),
    (
        "Machine Learning",
        "Build neural networks with TensorFlow and apply them to NLP and OpenCV vision tasks.",
    ),
    (
        "Cloud Computing",
        "Deploy containerized services with Docker on Linux hosts.",
    ),
    (
        "Cloud Computing",
        "Explain cloud service models and provision resources on AWS.",
    ),
    (
        "Cybersecurity Fundamentals",
        "Capture and inspect network traffic with Wireshark.",
    ),
    (
        "Cybersecurity Fundamentals",
        "Apply symmetric and public-key encryption to protect data at rest and in transit.",
    ),
];

pub const MOCK_JOB_DESCRIPTIONS: &[&str] = &[
    "Backend engineer: Python and SQL services deployed on AWS with Docker and Kubernetes.",
    "Full-stack developer with React, Node.js and PostgreSQL experience, working in an Agile team.",
    "Data engineer building Spark pipelines and Tableau dashboards on the cloud.",
    "Machine learning engineer: TensorFlow, NLP and Python, familiarity with Git workflows.",
    "Site reliability engineer managing Linux fleets, Kubernetes clusters and AWS infrastructure.",
    "Java developer for enterprise services, Scrum ceremonies and code review with Git.",
    "Security analyst monitoring traffic with Wireshark and auditing encryption practices.",
    "Frontend developer: JavaScript, HTML, CSS and React component libraries.",
    "Robotics software engineer using ROS, C++ and OpenCV.",
    "Blockchain developer writing Solidity smart contracts.",
    "Cloud engineer automating Docker builds and cloud deployments.",
    "Database developer optimizing SQL queries and MongoDB collections.",
];

pub const MOCK_STANDARD_COMPETENCIES: &[&str] = &[
    "Design, implement and test programs in a high-level language such as Python or Java.",
    "Use version control systems such as Git in team software development.",
    "Model data and write queries in SQL against relational databases.",
    "Explain the principles of cloud computing and virtualization.",
    "Apply encryption and secure protocols to protect information systems.",
    "Apply machine learning techniques to classify and predict from data.",
    "Work effectively in Agile teams using iterative development practices.",
    "Analyze algorithms for correctness and efficiency.",
    "Build web applications using HTML, CSS and JavaScript.",
    "Operate and administer Linux systems from the command line.",
];
